// Listener module
// Binds the TCP listener, optionally scanning for the first free port

use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::BindError;
use crate::logger;

/// Create a `TcpListener` with `SO_REUSEADDR` enabled.
///
/// `SO_REUSEADDR` only lets us rebind over connections in `TIME_WAIT` after a
/// restart; a port with a live listener still fails with `AddrInUse`, which
/// the free-port scan relies on.
pub fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

/// Bind according to `[server]`: the fixed port, or the first free one when
/// `auto_port` is set
pub fn bind(config: &ServerConfig) -> Result<TcpListener, BindError> {
    let ip = resolve_host(&config.host)?;

    if config.auto_port {
        return bind_first_free(ip, config.port, config.port_search_attempts);
    }

    let addr = SocketAddr::new(ip, config.port);
    create_listener(addr).map_err(|source| BindError::Io { addr, source })
}

/// Try `start`, `start + 1`, ... for `attempts` ports
///
/// Only `AddrInUse` moves on to the next port; any other error aborts.
pub fn bind_first_free(ip: IpAddr, start: u16, attempts: u16) -> Result<TcpListener, BindError> {
    for port in (start..=u16::MAX).take(usize::from(attempts)) {
        let addr = SocketAddr::new(ip, port);
        match create_listener(addr) {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => logger::log_port_in_use(port),
            Err(source) => return Err(BindError::Io { addr, source }),
        }
    }

    Err(BindError::NoFreePort {
        start,
        end: start.saturating_add(attempts),
    })
}

/// Accept an IP literal or a resolvable host name such as `localhost`
fn resolve_host(host: &str) -> Result<IpAddr, BindError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    (host, 0)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| addr.ip())
        .ok_or_else(|| BindError::InvalidAddress(host.to_string()))
}
