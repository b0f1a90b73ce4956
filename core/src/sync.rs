//! Cross-instance lockstep interface. The transport is external; the core
//! only exchanges a hash and a mismatch flag once per frame.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionType {
    Server,
    Client,
}

pub trait SyncProtocol {
    fn is_server(&self) -> bool;
    fn is_client(&self) -> bool;

    fn is_standalone(&self) -> bool {
        !self.is_server() && !self.is_client()
    }

    fn send_value(&mut self, channel: ConnectionType, value: u32);
    fn recv_value(&mut self, channel: ConnectionType) -> u32;
    fn send_flag(&mut self, channel: ConnectionType, value: bool);
    fn recv_flag(&mut self, channel: ConnectionType) -> bool;

    fn shutdown_server(&mut self);
    fn shutdown_client(&mut self);
}

/// Single-instance protocol; the determinism exchange is skipped entirely.
#[derive(Default)]
pub struct Standalone;

impl SyncProtocol for Standalone {
    fn is_server(&self) -> bool {
        false
    }

    fn is_client(&self) -> bool {
        false
    }

    fn send_value(&mut self, _channel: ConnectionType, _value: u32) {}

    fn recv_value(&mut self, _channel: ConnectionType) -> u32 {
        0
    }

    fn send_flag(&mut self, _channel: ConnectionType, _value: bool) {}

    fn recv_flag(&mut self, _channel: ConnectionType) -> bool {
        false
    }

    fn shutdown_server(&mut self) {}

    fn shutdown_client(&mut self) {}
}
