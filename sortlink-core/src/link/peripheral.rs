//! SLE peripheral adapter (63B board)
//!
//! Exposes one writable cargo property. Every valid frame the host writes
//! replaces the local cargo store wholesale.
//!
//! ```text
//!   Idle ──start──▶ Advertising ──Connected──▶ Connected
//!    ▲                   ▲                         │
//!    │                   └──────Disconnected───────┤
//!    └────────── re-announce failed ───────────────┘
//! ```

use heapless::String;
use sortlink_hal::sle::{
    AnnounceConfig, PropertyDescriptor, ServiceHandles, OPERATE_READ, OPERATE_WRITE,
    PERMISSION_READ, PERMISSION_WRITE,
};
use sortlink_hal::SlePeripheralTransport;
use sortlink_protocol::{decode_cargo_frame, encode_cargo_frame, CargoSnapshot, MAX_CARGO_FRAME_LEN};

use super::events::PeripheralEvent;
use super::state::{LinkState, LinkStatus};
use super::LinkError;
use crate::config::LinkConfig;
use crate::store::CargoStore;

/// Peripheral lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralState {
    /// Not announcing (before start, or a re-announce failed)
    Idle,
    Advertising,
    Connected,
}

/// Cargo server on the 63B board
pub struct SlePeripheral<'a, T: SlePeripheralTransport> {
    transport: T,
    config: LinkConfig,
    store: &'a CargoStore,
    status: &'a LinkStatus,
    state: PeripheralState,
    link: LinkState,
    handles: Option<ServiceHandles>,
}

impl<'a, T: SlePeripheralTransport> SlePeripheral<'a, T> {
    pub fn new(transport: T, config: LinkConfig, store: &'a CargoStore, status: &'a LinkStatus) -> Self {
        Self {
            transport,
            config,
            store,
            status,
            state: PeripheralState::Idle,
            link: LinkState::new(),
            handles: None,
        }
    }

    /// Register the cargo service and start announcing
    pub fn start(&mut self) -> Result<(), LinkError<T::Error>> {
        let property = PropertyDescriptor {
            uuid: self.config.property_uuid(),
            permissions: PERMISSION_READ | PERMISSION_WRITE,
            operations: OPERATE_READ | OPERATE_WRITE,
        };
        let handles = self
            .transport
            .add_service(self.config.service_uuid(), &property)
            .map_err(LinkError::Register)?;
        debug!(
            "service registered: server {} service {=u16:#x} property {=u16:#x}",
            handles.server_id, handles.service, handles.property
        );
        self.handles = Some(handles);

        let announce = AnnounceConfig {
            handle: self.config.announce_handle,
            own_addr: self.config.server_addr(),
            device_name: self.config.device_name.as_str(),
            interval: self.config.announce_interval,
        };
        self.transport
            .configure_announce(&announce)
            .map_err(LinkError::Announce)?;
        self.transport
            .start_announce(self.config.announce_handle)
            .map_err(LinkError::Announce)?;

        self.state = PeripheralState::Advertising;
        info!("announcing as {}", self.config.device_name.as_str());
        Ok(())
    }

    /// Feed one stack event through the state machine
    pub fn handle_event(&mut self, event: PeripheralEvent) {
        match event {
            PeripheralEvent::Connected { conn, addr } => {
                info!("central connected: conn {} addr {}", conn, addr);
                self.link.connect(conn);
                self.state = PeripheralState::Connected;
                self.status.set_connected(true);
            }
            PeripheralEvent::Disconnected { conn, reason } => {
                info!("central disconnected: conn {} reason {=u8:#x}", conn, reason);
                self.link.disconnect();
                self.status.set_connected(false);
                self.state = match self.transport.start_announce(self.config.announce_handle) {
                    Ok(()) => PeripheralState::Advertising,
                    Err(_) => {
                        warn!("re-announce failed, staying idle");
                        PeripheralState::Idle
                    }
                };
            }
            PeripheralEvent::WriteRequest { ok, data, .. } => self.on_write(ok, &data),
            PeripheralEvent::ReadRequest { conn, request_id, .. } => {
                let frame = self.serve_read();
                if self
                    .transport
                    .respond_read(conn, request_id, frame.as_bytes())
                    .is_err()
                {
                    warn!("read response failed");
                }
            }
        }
    }

    fn on_write(&mut self, ok: bool, data: &[u8]) {
        if !ok {
            warn!("write request reported failure, dropped");
            return;
        }
        if data.is_empty() {
            warn!("empty write request, dropped");
            return;
        }

        match decode_cargo_frame(data) {
            Some(fields) => {
                let snapshot = CargoSnapshot::from_fields(fields);
                self.store.apply_replace(snapshot);
                debug!("cargo replaced: {}", snapshot);
            }
            None => warn!("undecodable cargo frame ({} bytes), dropped", data.len()),
        }
    }

    /// Current cargo record, once a valid frame was received
    pub fn get_cargo_info(&self) -> Option<CargoSnapshot> {
        self.store.read_valid()
    }

    /// Frame for a read request on the cargo property
    pub fn serve_read(&self) -> String<MAX_CARGO_FRAME_LEN> {
        encode_cargo_frame(&self.store.read_snapshot())
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn state(&self) -> PeripheralState {
        self.state
    }

    /// Handles assigned at registration
    pub fn handles(&self) -> Option<ServiceHandles> {
        self.handles
    }

    /// Access the transport (for board glue and tests)
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
