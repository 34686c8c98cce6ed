//! Scripted network and recording sink shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::rc::Rc;
use std::time::Duration;

use supl_transport::connection::{ConnectionSettings, Network, SuplConnection, SuplSocket};
use supl_transport::DiagnosticSink;

/// Calls observed by the scripted network, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Resolve(String),
    Create(SocketAddr),
    SetReadTimeout(Duration),
    Connect(SocketAddr),
    Send(Vec<u8>),
    Recv,
    Close(SocketAddr),
}

/// Canned results and the event log
#[derive(Debug, Default)]
pub struct Script {
    pub resolution: Option<io::Result<Vec<SocketAddr>>>,
    pub fail_create: bool,
    pub fail_config: bool,
    pub refuse: Vec<IpAddr>,
    pub fail_close: bool,
    pub send_results: VecDeque<io::Result<usize>>,
    pub recv_results: VecDeque<io::Result<Vec<u8>>>,
    pub events: Vec<Event>,
}

pub type SharedScript = Rc<RefCell<Script>>;

pub struct ScriptedNetwork {
    pub script: SharedScript,
}

pub struct ScriptedSocket {
    addr: SocketAddr,
    script: SharedScript,
}

impl Network for ScriptedNetwork {
    type Socket = ScriptedSocket;

    fn resolve(&mut self, host: &str) -> io::Result<Vec<SocketAddr>> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Resolve(host.to_string()));
        script.resolution.take().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn socket(&mut self, addr: &SocketAddr) -> io::Result<ScriptedSocket> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Create(*addr));
        if script.fail_create {
            return Err(io::Error::new(io::ErrorKind::Other, "out of descriptors"));
        }
        Ok(ScriptedSocket {
            addr: *addr,
            script: Rc::clone(&self.script),
        })
    }
}

impl SuplSocket for ScriptedSocket {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::SetReadTimeout(timeout));
        if script.fail_config {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "option not supported"));
        }
        Ok(())
    }

    fn connect(&mut self, addr: SocketAddr, _timeout: Option<Duration>) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Connect(addr));
        if script.refuse.contains(&addr.ip()) {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
        }
        Ok(())
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Send(buf.to_vec()));
        script.send_results.pop_front().unwrap_or(Ok(buf.len()))
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Recv);
        match script.recv_results.pop_front() {
            Some(Ok(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(Err(e)) => Err(e),
            None => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        }
    }

    fn close(self) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Close(self.addr));
        if script.fail_close {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        Ok(())
    }
}

/// Diagnostic line as emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Print(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: RefCell<Vec<Line>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<Line> {
        self.lines.borrow().clone()
    }

    pub fn prints(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                Line::Print(text) => Some(text),
                Line::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                Line::Error(text) => Some(text),
                Line::Print(_) => None,
            })
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn print(&self, message: &str) {
        self.lines.borrow_mut().push(Line::Print(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.lines.borrow_mut().push(Line::Error(message.to_string()));
    }
}

pub fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

pub fn settings() -> ConnectionSettings {
    ConnectionSettings {
        host: "supl.example.net".to_string(),
        ..ConnectionSettings::default()
    }
}

/// Connection on a scripted network that resolves to `candidates`
pub fn scripted(
    candidates: Vec<SocketAddr>,
) -> (SuplConnection<ScriptedNetwork, RecordingSink>, SharedScript) {
    let script = Rc::new(RefCell::new(Script {
        resolution: Some(Ok(candidates)),
        ..Script::default()
    }));
    let network = ScriptedNetwork {
        script: Rc::clone(&script),
    };
    let conn = SuplConnection::new(network, RecordingSink::default(), settings());
    (conn, script)
}

pub fn events(script: &SharedScript) -> Vec<Event> {
    script.borrow().events.clone()
}
