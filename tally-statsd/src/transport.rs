// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{
    io,
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    sync::Arc,
};

/// Delivers encoded datagrams.
///
/// Implementations must not block for long: [`StatsdClient`](crate::StatsdClient) sends on the
/// caller's thread.
pub trait Transport: Send + Sync {
    /// Send one datagram.
    fn send(&self, datagram: &[u8]) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, datagram: &[u8]) -> io::Result<()> {
        (**self).send(datagram)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, datagram: &[u8]) -> io::Result<()> {
        (**self).send(datagram)
    }
}

/// A [`Transport`] over a connected, non-blocking UDP socket.
///
/// A full socket buffer surfaces as [`io::ErrorKind::WouldBlock`] instead of stalling the caller.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Resolve `addr`, then bind an ephemeral local port of the same address family and connect it
    /// to the first resolved address.
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let peer = addr.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
        })?;
        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => ([0, 0, 0, 0], 0).into(),
            SocketAddr::V6(_) => ([0u16; 8], 0).into(),
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(peer)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket, peer })
    }

    /// The address datagrams are sent to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for UdpTransport {
    fn send(&self, datagram: &[u8]) -> io::Result<()> {
        let sent = self.socket.send(datagram)?;
        if sent != datagram.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("datagram truncated: sent {sent} of {} bytes", datagram.len()),
            ));
        }
        Ok(())
    }
}
