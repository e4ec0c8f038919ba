//! SLE central adapter (host board)
//!
//! Finds the 63B by its fixed address, walks it through pairing, MTU
//! exchange and discovery, then pushes cargo frames into its property.
//!
//! ```text
//! Idle → Scanning → Connecting → Pairing → Exchanging → Discovering → Ready
//!                                    │
//!                                    └─ fail ─▶ PairFailed
//!
//! any state ── Disconnected ──▶ (rescan after backoff) ──▶ Scanning
//! ```
//!
//! Handlers only submit requests and return; delays are expressed as
//! [`Followup`]s for the owning task.

use sortlink_hal::sle::{SeekParams, OPERATE_WRITE};
use sortlink_hal::{HandleRange, SleAddr, SleCentralTransport};
use sortlink_protocol::{decode_cargo_frame, encode_cargo_frame, CargoSnapshot};

use super::events::{CentralEvent, ConnectionState, Followup};
use super::state::{LinkState, LinkStatus};
use super::LinkError;
use crate::config::LinkConfig;

/// Central lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CentralState {
    Idle,
    Scanning,
    Connecting,
    Pairing,
    Exchanging,
    Discovering,
    Ready,
    /// Connected, but pairing failed; waits for a disconnect
    PairFailed,
}

/// Why a cargo push was not submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    NotConnected,
    /// Discovery has not found the cargo property yet
    NoWriteHandle,
    /// The stack refused the write request
    Transport,
}

/// Cargo client on the host board
pub struct SleCentral<'a, T: SleCentralTransport> {
    transport: T,
    config: LinkConfig,
    status: &'a LinkStatus,
    state: CentralState,
    link: LinkState,
    peer: Option<SleAddr>,
}

impl<'a, T: SleCentralTransport> SleCentral<'a, T> {
    pub fn new(transport: T, config: LinkConfig, status: &'a LinkStatus) -> Self {
        Self {
            transport,
            config,
            status,
            state: CentralState::Idle,
            link: LinkState::new(),
            peer: None,
        }
    }

    /// Set the local address and start the first scan
    pub fn start(&mut self) -> Result<(), LinkError<T::Error>> {
        self.transport
            .set_local_addr(&self.config.client_addr())
            .map_err(LinkError::Address)?;
        self.start_scan()
    }

    /// Start a passive seek
    pub fn start_scan(&mut self) -> Result<(), LinkError<T::Error>> {
        self.transport
            .start_seek(&SeekParams::default())
            .map_err(LinkError::Seek)?;
        self.state = CentralState::Scanning;
        debug!("seeking for {}", self.config.server_addr());
        Ok(())
    }

    /// Feed one stack event through the state machine
    pub fn handle_event(&mut self, event: CentralEvent) -> Option<Followup> {
        match event {
            CentralEvent::SeekResult { addr } => self.on_seek_result(addr),
            CentralEvent::ConnectionChanged {
                conn,
                addr,
                state: ConnectionState::Connected,
                paired,
                ..
            } => {
                if addr != self.config.server_addr() {
                    warn!("ignoring connection from {}", addr);
                    return None;
                }
                info!("connected to 63B: conn {} paired {}", conn, paired);
                self.link.connect(conn);
                self.status.set_connected(true);
                if paired {
                    self.exchange();
                } else {
                    self.pair();
                }
                None
            }
            CentralEvent::ConnectionChanged {
                state: ConnectionState::Disconnected,
                reason,
                ..
            } => {
                info!("disconnected from 63B: reason {=u8:#x}", reason);
                self.link.disconnect();
                self.status.set_connected(false);
                self.state = CentralState::Idle;
                Some(Followup::RescanAfter(self.config.rescan_delay_ms))
            }
            CentralEvent::PairComplete { ok: true, .. } => {
                self.exchange();
                None
            }
            CentralEvent::PairComplete { ok: false, .. } => {
                warn!("pairing failed");
                self.state = CentralState::PairFailed;
                None
            }
            CentralEvent::ExchangeInfo { ok: true, mtu, .. } => {
                debug!("mtu exchanged: {}", mtu);
                self.discover_services();
                None
            }
            CentralEvent::ExchangeInfo { ok: false, .. } => {
                warn!("info exchange failed");
                None
            }
            CentralEvent::ServiceFound { uuid, range, .. } => {
                if uuid.matches(self.config.service_uuid) {
                    self.discover_properties(range);
                } else {
                    debug!("skipping service {}", uuid.short());
                }
                None
            }
            CentralEvent::PropertyFound {
                uuid,
                handle,
                operations,
                ..
            } => self.on_property(uuid.matches(self.config.property_uuid), handle, operations),
            CentralEvent::WriteConfirmed { handle, ok, .. } => {
                if ok {
                    debug!("write confirmed: handle {=u16:#x}", handle);
                } else {
                    warn!("write rejected: handle {=u16:#x}", handle);
                }
                None
            }
            CentralEvent::Notification { data, .. } => {
                match decode_cargo_frame(&data) {
                    Some(fields) => debug!("63B reports {}", CargoSnapshot::from_fields(fields)),
                    None => debug!("notification ({} bytes) not a cargo frame", data.len()),
                }
                None
            }
        }
    }

    fn on_seek_result(&mut self, addr: SleAddr) -> Option<Followup> {
        if self.state != CentralState::Scanning || addr != self.config.server_addr() {
            return None;
        }

        info!("found 63B at {}", addr);
        if self.transport.stop_seek().is_err() {
            warn!("stop seek failed");
        }
        self.peer = Some(addr);

        match self.transport.connect(&addr) {
            Ok(()) => {
                self.state = CentralState::Connecting;
                None
            }
            Err(_) => {
                warn!("connect request failed");
                self.state = CentralState::Idle;
                Some(Followup::RescanAfter(self.config.connect_retry_ms))
            }
        }
    }

    fn pair(&mut self) {
        self.state = CentralState::Pairing;
        if let Some(peer) = self.peer {
            if self.transport.pair(&peer).is_err() {
                warn!("pair request failed");
            }
        }
    }

    fn exchange(&mut self) {
        self.state = CentralState::Exchanging;
        if let Some(conn) = self.link.peer_handle() {
            if self.transport.exchange_info(conn, self.config.mtu).is_err() {
                warn!("exchange request failed");
            }
        }
    }

    fn discover_services(&mut self) {
        self.state = CentralState::Discovering;
        if let Some(conn) = self.link.peer_handle() {
            if self.transport.find_services(conn, HandleRange::FULL).is_err() {
                warn!("service discovery request failed");
            }
        }
    }

    fn discover_properties(&mut self, range: HandleRange) {
        if let Some(conn) = self.link.peer_handle() {
            if self.transport.find_properties(conn, range).is_err() {
                warn!("property discovery request failed");
            }
        }
    }

    fn on_property(&mut self, is_cargo: bool, handle: u16, operations: u8) -> Option<Followup> {
        if !is_cargo || operations & OPERATE_WRITE == 0 {
            return None;
        }
        if !self.link.set_write_handle(handle) {
            return None;
        }

        info!("cargo property ready: handle {=u16:#x}", handle);
        self.state = CentralState::Ready;
        Some(Followup::PushAfter(self.config.first_push_delay_ms))
    }

    /// Write a cargo frame to the 63B
    ///
    /// Fire-and-forget: success means the request was submitted. Nothing
    /// reaches the transport unless connected with a known write handle.
    pub fn send_cargo_data(&mut self, snapshot: &CargoSnapshot) -> Result<(), SendError> {
        let conn = match self.link.peer_handle() {
            Some(conn) if self.link.is_connected() => conn,
            _ => return Err(SendError::NotConnected),
        };
        let handle = self.link.write_handle().ok_or(SendError::NoWriteHandle)?;

        let frame = encode_cargo_frame(snapshot);
        self.transport
            .write_request(conn, handle, frame.as_bytes())
            .map_err(|_| SendError::Transport)?;
        debug!("pushed {}", frame.as_str());
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn state(&self) -> CentralState {
        self.state
    }

    /// Access the transport (for board glue and tests)
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::events::payload;
    use heapless::Vec;
    use sortlink_hal::{ConnId, SleUuid};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        SetLocalAddr,
        StartSeek,
        StopSeek,
        Connect(SleAddr),
        Pair,
        Exchange(u16),
        FindServices(HandleRange),
        FindProperties(HandleRange),
        Write(u16, Vec<u8, 128>),
    }

    #[derive(Default)]
    struct MockCentral {
        calls: Vec<Call, 32>,
        fail_connect: bool,
    }

    impl MockCentral {
        fn record(&mut self, call: Call) -> Result<(), ()> {
            let _ = self.calls.push(call);
            Ok(())
        }
    }

    impl SleCentralTransport for MockCentral {
        type Error = ();

        fn set_local_addr(&mut self, _addr: &SleAddr) -> Result<(), ()> {
            self.record(Call::SetLocalAddr)
        }

        fn start_seek(&mut self, params: &SeekParams) -> Result<(), ()> {
            assert!(!params.active);
            self.record(Call::StartSeek)
        }

        fn stop_seek(&mut self) -> Result<(), ()> {
            self.record(Call::StopSeek)
        }

        fn connect(&mut self, addr: &SleAddr) -> Result<(), ()> {
            self.record(Call::Connect(*addr))?;
            if self.fail_connect {
                Err(())
            } else {
                Ok(())
            }
        }

        fn pair(&mut self, _addr: &SleAddr) -> Result<(), ()> {
            self.record(Call::Pair)
        }

        fn exchange_info(&mut self, _conn: ConnId, mtu: u16) -> Result<(), ()> {
            self.record(Call::Exchange(mtu))
        }

        fn find_services(&mut self, _conn: ConnId, range: HandleRange) -> Result<(), ()> {
            self.record(Call::FindServices(range))
        }

        fn find_properties(&mut self, _conn: ConnId, range: HandleRange) -> Result<(), ()> {
            self.record(Call::FindProperties(range))
        }

        fn write_request(&mut self, _conn: ConnId, handle: u16, data: &[u8]) -> Result<(), ()> {
            self.record(Call::Write(handle, Vec::from_slice(data).unwrap()))
        }
    }

    const SERVER: SleAddr = SleAddr::new([0x04, 0x01, 0x06, 0x08, 0x06, 0x03]);

    fn connected(paired: bool) -> CentralEvent {
        CentralEvent::ConnectionChanged {
            conn: 5,
            addr: SERVER,
            state: ConnectionState::Connected,
            paired,
            reason: 0,
        }
    }

    fn disconnected() -> CentralEvent {
        CentralEvent::ConnectionChanged {
            conn: 5,
            addr: SERVER,
            state: ConnectionState::Disconnected,
            paired: false,
            reason: 0x13,
        }
    }

    fn property(uuid: u16, operations: u8) -> CentralEvent {
        CentralEvent::PropertyFound {
            conn: 5,
            uuid: SleUuid::from_u16(uuid),
            handle: 0x22,
            operations,
        }
    }

    /// Drive a fresh adapter all the way to `Ready`
    fn ready(status: &LinkStatus) -> SleCentral<'_, MockCentral> {
        let mut central = SleCentral::new(MockCentral::default(), LinkConfig::default(), status);
        central.start().unwrap();
        central.handle_event(CentralEvent::SeekResult { addr: SERVER });
        central.handle_event(connected(false));
        central.handle_event(CentralEvent::PairComplete { conn: 5, ok: true });
        central.handle_event(CentralEvent::ExchangeInfo {
            conn: 5,
            ok: true,
            mtu: 512,
        });
        central.handle_event(CentralEvent::ServiceFound {
            conn: 5,
            uuid: SleUuid::from_u16(0xABCD),
            range: HandleRange::new(0x10, 0x30),
        });
        let followup = central.handle_event(property(0x1122, OPERATE_WRITE));
        assert_eq!(followup, Some(Followup::PushAfter(100)));
        central
    }

    #[test]
    fn test_full_handshake() {
        let status = LinkStatus::new();
        let central = ready(&status);

        assert_eq!(central.state(), CentralState::Ready);
        assert!(status.is_connected());
        assert_eq!(
            central.transport().calls.as_slice(),
            &[
                Call::SetLocalAddr,
                Call::StartSeek,
                Call::StopSeek,
                Call::Connect(SERVER),
                Call::Pair,
                Call::Exchange(512),
                Call::FindServices(HandleRange::FULL),
                Call::FindProperties(HandleRange::new(0x10, 0x30)),
            ]
        );
    }

    #[test]
    fn test_ignores_other_devices() {
        let status = LinkStatus::new();
        let mut central = SleCentral::new(MockCentral::default(), LinkConfig::default(), &status);
        central.start_scan().unwrap();

        let other = SleAddr::new([1, 2, 3, 4, 5, 6]);
        assert_eq!(central.handle_event(CentralEvent::SeekResult { addr: other }), None);
        assert_eq!(central.state(), CentralState::Scanning);
        assert_eq!(central.transport().calls.len(), 1);
    }

    #[test]
    fn test_connect_failure_rescans() {
        let status = LinkStatus::new();
        let transport = MockCentral {
            fail_connect: true,
            ..Default::default()
        };
        let mut central = SleCentral::new(transport, LinkConfig::default(), &status);
        central.start_scan().unwrap();

        let followup = central.handle_event(CentralEvent::SeekResult { addr: SERVER });
        assert_eq!(followup, Some(Followup::RescanAfter(1000)));
        assert_eq!(central.state(), CentralState::Idle);
    }

    #[test]
    fn test_already_paired_skips_pairing() {
        let status = LinkStatus::new();
        let mut central = SleCentral::new(MockCentral::default(), LinkConfig::default(), &status);
        central.start_scan().unwrap();
        central.handle_event(CentralEvent::SeekResult { addr: SERVER });
        central.handle_event(connected(true));

        assert_eq!(central.state(), CentralState::Exchanging);
        assert_eq!(central.transport().calls.last(), Some(&Call::Exchange(512)));
    }

    #[test]
    fn test_foreign_connection_ignored() {
        let status = LinkStatus::new();
        let mut central = SleCentral::new(MockCentral::default(), LinkConfig::default(), &status);
        central.start_scan().unwrap();
        central.handle_event(CentralEvent::SeekResult { addr: SERVER });
        let calls = central.transport().calls.len();

        let followup = central.handle_event(CentralEvent::ConnectionChanged {
            conn: 9,
            addr: SleAddr::new([0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]),
            state: ConnectionState::Connected,
            paired: true,
            reason: 0,
        });

        assert_eq!(followup, None);
        assert!(!central.is_connected());
        assert!(!status.is_connected());
        assert_eq!(central.state(), CentralState::Connecting);
        assert_eq!(central.transport().calls.len(), calls);
        assert_eq!(
            central.send_cargo_data(&CargoSnapshot::new(1, 1, 1, 1)),
            Err(SendError::NotConnected)
        );
    }

    #[test]
    fn test_pair_failure_is_terminal_until_disconnect() {
        let status = LinkStatus::new();
        let mut central = SleCentral::new(MockCentral::default(), LinkConfig::default(), &status);
        central.start_scan().unwrap();
        central.handle_event(CentralEvent::SeekResult { addr: SERVER });
        central.handle_event(connected(false));
        central.handle_event(CentralEvent::PairComplete { conn: 5, ok: false });

        assert_eq!(central.state(), CentralState::PairFailed);
        assert!(central.is_connected());
        assert_eq!(
            central.send_cargo_data(&CargoSnapshot::new(1, 1, 1, 1)),
            Err(SendError::NoWriteHandle)
        );
    }

    #[test]
    fn test_property_without_write_bit_ignored() {
        let status = LinkStatus::new();
        let mut central = SleCentral::new(MockCentral::default(), LinkConfig::default(), &status);
        central.start_scan().unwrap();
        central.handle_event(CentralEvent::SeekResult { addr: SERVER });
        central.handle_event(connected(true));

        assert_eq!(central.handle_event(property(0x1122, 0x01)), None);
        assert_eq!(central.handle_event(property(0x3344, OPERATE_WRITE)), None);
        assert_ne!(central.state(), CentralState::Ready);
    }

    #[test]
    fn test_send_without_write_handle_makes_no_calls() {
        let status = LinkStatus::new();
        let mut central = SleCentral::new(MockCentral::default(), LinkConfig::default(), &status);
        let snapshot = CargoSnapshot::new(1, 2, 3, 4);

        assert_eq!(central.send_cargo_data(&snapshot), Err(SendError::NotConnected));
        assert!(central.transport().calls.is_empty());

        central.handle_event(connected(true));
        let before = central.transport().calls.len();
        assert_eq!(central.send_cargo_data(&snapshot), Err(SendError::NoWriteHandle));
        assert_eq!(central.transport().calls.len(), before);
    }

    #[test]
    fn test_send_writes_frame() {
        let status = LinkStatus::new();
        let mut central = ready(&status);

        central
            .send_cargo_data(&CargoSnapshot::new(3, 0, 0, 1234))
            .unwrap();
        assert_eq!(
            central.transport().calls.last(),
            Some(&Call::Write(0x22, Vec::from_slice(b"J:3,Z:0,S:0,T:1234").unwrap()))
        );
    }

    #[test]
    fn test_disconnect_clears_and_backs_off() {
        let status = LinkStatus::new();
        let mut central = ready(&status);

        let followup = central.handle_event(disconnected());
        assert_eq!(followup, Some(Followup::RescanAfter(2000)));
        assert!(!central.is_connected());
        assert!(!status.is_connected());
        assert_eq!(
            central.send_cargo_data(&CargoSnapshot::new(1, 1, 1, 1)),
            Err(SendError::NotConnected)
        );

        // A late property event cannot resurrect the write handle
        assert_eq!(central.handle_event(property(0x1122, OPERATE_WRITE)), None);
    }

    #[test]
    fn test_notification_is_informational() {
        let status = LinkStatus::new();
        let mut central = ready(&status);
        let calls = central.transport().calls.len();

        let followup = central.handle_event(CentralEvent::Notification {
            conn: 5,
            handle: 0x22,
            data: payload(b"J:9,Z:9,S:9"),
        });
        assert_eq!(followup, None);
        assert_eq!(central.transport().calls.len(), calls);
    }
}
