//! Per-connection client states and their transition table

/// Lifecycle state of one client record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientState {
    Idle,
    /// Discovery requested, handle table not yet known.
    AwaitingConnection,
    Ready,
    AwaitReadDispatch,
    AwaitingReadResult,
    AwaitWriteDispatch,
    AwaitingWriteResult,
}

/// Inputs that move a record between non-terminal states.
///
/// Discovery failure and disconnection are terminal: they release the record
/// and never reach this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientInput {
    Connect,
    DiscoveryComplete,
    ReadRequested,
    WriteRequested,
    /// The transport accepted the pending request.
    Dispatched,
    /// The transport refused the pending request.
    DispatchFailed,
    ReadResult,
    WriteResult,
}

impl ClientState {
    /// Next state for `input`, or `None` if the input is not accepted here.
    pub fn on(self, input: ClientInput) -> Option<ClientState> {
        use ClientInput::*;
        use ClientState::*;

        match (self, input) {
            (Idle, Connect) => Some(AwaitingConnection),
            (AwaitingConnection, DiscoveryComplete) => Some(Ready),
            (Ready, ReadRequested) => Some(AwaitReadDispatch),
            (Ready, WriteRequested) => Some(AwaitWriteDispatch),
            (AwaitReadDispatch, Dispatched) => Some(AwaitingReadResult),
            (AwaitWriteDispatch, Dispatched) => Some(AwaitingWriteResult),
            (AwaitReadDispatch | AwaitWriteDispatch, DispatchFailed) => Some(Ready),
            (AwaitingReadResult, ReadResult) => Some(Ready),
            (AwaitingWriteResult, WriteResult) => Some(Ready),
            _ => None,
        }
    }

    /// Discovery has completed and the handle table is valid.
    pub fn is_connected(self) -> bool {
        !matches!(self, ClientState::Idle | ClientState::AwaitingConnection)
    }

    /// A read or write is in flight or queued for dispatch.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            ClientState::AwaitReadDispatch
                | ClientState::AwaitingReadResult
                | ClientState::AwaitWriteDispatch
                | ClientState::AwaitingWriteResult
        )
    }

    pub fn is_dispatch_pending(self) -> bool {
        matches!(
            self,
            ClientState::AwaitReadDispatch | ClientState::AwaitWriteDispatch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ClientInput::*;
    use super::ClientState::*;
    use super::*;

    const ALL_STATES: [ClientState; 7] = [
        Idle,
        AwaitingConnection,
        Ready,
        AwaitReadDispatch,
        AwaitingReadResult,
        AwaitWriteDispatch,
        AwaitingWriteResult,
    ];

    #[test]
    fn test_read_cycle() {
        let state = Idle.on(Connect).unwrap();
        let state = state.on(DiscoveryComplete).unwrap();
        assert_eq!(state, Ready);
        let state = state.on(ReadRequested).unwrap();
        assert_eq!(state, AwaitReadDispatch);
        let state = state.on(Dispatched).unwrap();
        assert_eq!(state, AwaitingReadResult);
        assert_eq!(state.on(ReadResult), Some(Ready));
        assert_eq!(state.on(WriteResult), None);
    }

    #[test]
    fn test_requests_only_accepted_when_ready() {
        for state in ALL_STATES {
            let accepted = state.on(ReadRequested).is_some();
            assert_eq!(accepted, state == Ready, "{:?}", state);
            let accepted = state.on(WriteRequested).is_some();
            assert_eq!(accepted, state == Ready, "{:?}", state);
        }
    }

    #[test]
    fn test_dispatch_failure_returns_to_ready() {
        assert_eq!(AwaitReadDispatch.on(DispatchFailed), Some(Ready));
        assert_eq!(AwaitWriteDispatch.on(DispatchFailed), Some(Ready));
        assert_eq!(AwaitingReadResult.on(DispatchFailed), None);
    }

    #[test]
    fn test_predicates() {
        assert!(!AwaitingConnection.is_connected());
        assert!(Ready.is_connected());
        assert!(!Ready.is_busy());
        assert!(AwaitingWriteResult.is_busy());
        assert!(AwaitWriteDispatch.is_dispatch_pending());
        assert!(!AwaitingWriteResult.is_dispatch_pending());
    }
}
