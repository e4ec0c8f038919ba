//! Controller side of the bridge

use heapless::Vec;
use sortlink_hal::{DatagramSocket, UartRx, UartTx};
use sortlink_protocol::sort::{SORT_INFO_PREFIX, SORT_PREFIX};
use sortlink_protocol::{
    decode_line_select, decode_sort_event, decode_sort_info, encode_sort_ack, encode_sort_info,
};

use super::{Bridge, BOX_LABEL_LEN};

/// Bytes read from the controller per poll
pub const UART_READ_LEN: usize = 256;

/// Lines shorter than this are noise
pub const MIN_LINE_LEN: usize = 5;

fn is_line_break(byte: &u8) -> bool {
    matches!(byte, b'\r' | b'\n')
}

impl<'a, U, S> Bridge<'a, U, S>
where
    U: UartTx + UartRx,
    S: DatagramSocket,
{
    /// Read whatever the controller sent and handle it line by line
    ///
    /// `now` is the monotonic time (ms) stamped on increments. Lines are
    /// not reassembled across reads.
    pub fn poll_uart(&mut self, now: u64) {
        let mut buf = [0u8; UART_READ_LEN];
        let len = match self.uart.read_available(&mut buf) {
            Ok(0) => return,
            Ok(len) => len.min(UART_READ_LEN),
            Err(_) => {
                warn!("uart read failed");
                return;
            }
        };

        for line in buf[..len].split(is_line_break) {
            if line.len() >= MIN_LINE_LEN {
                self.handle_line(line, now);
            }
        }
    }

    fn handle_line(&mut self, line: &[u8], now: u64) {
        debug!("uart line: {=[u8]:a}", line);

        let head = &line[..line.len().min(BOX_LABEL_LEN)];
        self.box_label = Vec::from_slice(head).unwrap_or_default();

        if let Some(index) = decode_line_select(line) {
            info!("production line set to {}", index);
            self.line_index.set(index);
        } else if line.starts_with(SORT_PREFIX) || line.starts_with(SORT_INFO_PREFIX) {
            self.handle_sort(line, now);
        }

        if let Some(peer) = self.peer {
            self.send_to(line, &peer);
        }
    }

    fn handle_sort(&mut self, line: &[u8], now: u64) {
        let info = decode_sort_info(line);

        // The app gets the normalized frame ahead of the raw mirror
        if let (Some(info), Some(peer)) = (info, self.peer) {
            let frame = encode_sort_info(&info);
            self.send_to(frame.as_bytes(), &peer);
        }

        match decode_sort_event(line) {
            Some(event) => {
                self.count_sort(event, now);
                let ack = encode_sort_ack(event.region);
                self.write_uart(ack.as_bytes());
            }
            None => match info {
                Some(info) => warn!(
                    "unknown direction {=u8:#x} for parcel {=u8:#x}, not counted",
                    info.direction, info.id
                ),
                None => warn!("malformed sort frame, not counted"),
            },
        }
    }
}
