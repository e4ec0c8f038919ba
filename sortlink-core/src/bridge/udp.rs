//! App side of the bridge

use sortlink_hal::{DatagramSocket, SocketAddr, UartRx, UartTx};
use sortlink_protocol::directive::{
    REPLY_CONNECT_OK, REPLY_DEVICE_CMD_OK, REPLY_DEVICE_LIGHT_ON, REPLY_GENERIC,
};
use sortlink_protocol::{
    decode_sort_event, encode_cargo_status, parse_directive, Directive, SortEvent, SortSource,
};

use super::Bridge;

/// Largest datagram accepted from the app
pub const UDP_RECV_LEN: usize = 1024;

impl<'a, U, S> Bridge<'a, U, S>
where
    U: UartTx + UartRx,
    S: DatagramSocket,
{
    /// Handle at most one pending datagram
    ///
    /// `now` (ms) stamps increments from sort frames the app relays.
    pub fn poll_udp(&mut self, now: u64) {
        let mut buf = [0u8; UDP_RECV_LEN];
        let (len, from) = match self.socket.recv_from(&mut buf) {
            Ok(Some(received)) => received,
            Ok(None) => return,
            Err(_) => {
                warn!("udp receive failed");
                return;
            }
        };
        let datagram = &buf[..len.min(UDP_RECV_LEN)];

        if self.peer != Some(from) {
            info!("app peer now {}", from);
            self.peer = Some(from);
        }

        let directive = parse_directive(datagram);
        debug!("directive {} from {}", directive, from);
        if directive == Directive::Unknown {
            self.relayed_sort(datagram, now);
        }
        self.dispatch(directive, &from);
    }

    /// Count a `SORT:`/`sort_info` frame that reached us over UDP
    ///
    /// The controller is not acked; the app still gets the generic reply.
    fn relayed_sort(&mut self, datagram: &[u8], now: u64) {
        if let Some(event) = decode_sort_event(datagram) {
            self.count_sort(SortEvent::new(event.region, SortSource::UdpDirective), now);
        }
    }

    fn dispatch(&mut self, directive: Directive, from: &SocketAddr) {
        match directive {
            Directive::ConnectRequest => self.send_to(REPLY_CONNECT_OK.as_bytes(), from),
            Directive::CargoStatus => {
                let reply = encode_cargo_status(&self.store.read_snapshot());
                self.send_to(reply.as_bytes(), from);
            }
            Directive::Refresh => {
                let label = self.box_label.clone();
                self.send_to(&label, from);
            }
            Directive::UnloadPage => info!("app left the current page"),
            Directive::DeviceCommand(_) => {
                if let Some(command) = directive.uart_command() {
                    self.write_uart(&command.encode());
                }
                self.send_to(REPLY_DEVICE_CMD_OK.as_bytes(), from);
                self.send_to(REPLY_DEVICE_LIGHT_ON.as_bytes(), from);
            }
            Directive::DisplayIndex(index) => {
                info!("display line index {}", index);
                self.line_index.set(index);
                self.send_to(REPLY_GENERIC.as_bytes(), from);
            }
            Directive::Unknown => self.send_to(REPLY_GENERIC.as_bytes(), from),
            _ => match directive.uart_command() {
                Some(command) => {
                    self.write_uart(&command.encode());
                    self.send_to(REPLY_DEVICE_LIGHT_ON.as_bytes(), from);
                }
                None => warn!("invalid parameter in {}, ignored", directive),
            },
        }
    }
}
