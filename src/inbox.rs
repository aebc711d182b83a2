//! The inbound message source.
//!
//! Arrivals are opaque strings from outside the process. Producers clone
//! the sender; the frame tick drains the channel. Messages may arrive at
//! any time, including before the font is ready — gating happens at the
//! receiving end, not here.

use std::io::BufRead;
use std::sync::mpsc;

pub struct MessageInbox {
    tx: mpsc::Sender<String>,
    rx: mpsc::Receiver<String>,
}

impl MessageInbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// A handle any producer thread can use to deliver messages.
    pub fn sender(&self) -> mpsc::Sender<String> {
        self.tx.clone()
    }

    /// Drain everything that arrived since the last frame.
    pub fn drain(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Read lines from stdin on a background thread and feed them in.
    /// Empty lines are skipped; EOF ends the thread quietly.
    pub fn spawn_stdin_reader(&self) {
        let tx = self.sender();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if tx.send(trimmed.to_string()).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for MessageInbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_arrival_order() {
        let mut inbox = MessageInbox::new();
        let tx = inbox.sender();
        tx.send("first".to_string()).unwrap();
        tx.send("second".to_string()).unwrap();
        assert_eq!(inbox.drain(), vec!["first", "second"]);
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn senders_work_across_threads() {
        let mut inbox = MessageInbox::new();
        let tx = inbox.sender();
        let handle = std::thread::spawn(move || {
            tx.send("from thread".to_string()).unwrap();
        });
        handle.join().unwrap();
        assert_eq!(inbox.drain(), vec!["from thread"]);
    }
}
