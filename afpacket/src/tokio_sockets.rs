use crate::sockets;
use futures::{
    ready,
    task::{Context, Poll},
    Future,
};
use mio::{unix::EventedFd, Evented, PollOpt, Ready, Token};
use std::{ffi::CStr, io, pin::Pin};
use tokio::io::PollEvented;

impl Evented for sockets::BoundSocket {
    fn register(
        &self,
        poll: &mio::Poll,
        token: Token,
        interest: Ready,
        opts: PollOpt,
    ) -> io::Result<()> {
        EventedFd(&self.raw_fd()).register(poll, token, interest, opts)
    }

    fn reregister(
        &self,
        poll: &mio::Poll,
        token: Token,
        interest: Ready,
        opts: PollOpt,
    ) -> io::Result<()> {
        EventedFd(&self.raw_fd()).reregister(poll, token, interest, opts)
    }

    fn deregister(&self, poll: &mio::Poll) -> io::Result<()> {
        EventedFd(&self.raw_fd()).deregister(poll)
    }
}

/// Represents a bound `AF_PACKET` socket for use with Tokio. At this phase in a
/// socket's lifecycle, it can be read and written from.
pub struct AsyncBoundSocket {
    sock: PollEvented<sockets::BoundSocket>,
}

impl AsyncBoundSocket {
    /// Constructs an `AsyncBoundSocket` from a network interface name.
    pub fn from_interface(iface: impl AsRef<CStr>) -> io::Result<Self> {
        let mut sock = sockets::Socket::new()?;
        sock.set_nonblocking(true)?;
        let sock = sock.bind(iface)?;
        Ok(Self {
            sock: PollEvented::new(sock)?,
        })
    }

    /// Turns promiscuous mode on or off on this NIC. Useful for receiving all packets on an
    /// interface, including those not addressed to the device.
    pub fn set_promiscuous(&mut self, p: bool) -> io::Result<()> {
        self.sock.get_mut().set_promiscuous(p)
    }

    /// Returns the hardware address of the bound interface.
    pub fn hardware_addr(&self) -> io::Result<[u8; 6]> {
        self.sock.get_ref().hardware_addr()
    }

    /// Returns `Poll::Pending` until there is a packet available.
    pub fn poll_can_rx(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        ready!(self.sock.poll_read_ready(cx, Ready::readable()))?;
        Poll::Ready(Ok(()))
    }

    /// Returns `Poll::Pending` until a packet can be sent.
    pub fn poll_can_tx(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        ready!(self.sock.poll_write_ready(cx))?;
        Poll::Ready(Ok(()))
    }

    /// Sends a frame to the socket asynchronously.
    /// Returns `Poll::Pending` if the socket cannot be sent to.
    pub fn poll_send(&mut self, cx: &mut Context<'_>, frame: &[u8]) -> Poll<io::Result<usize>> {
        ready!(self.poll_can_tx(cx))?;
        match self.sock.get_mut().send(frame) {
            Ok(count) => Poll::Ready(Ok(count)),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                self.sock.clear_write_ready(cx)?;
                Poll::Pending
            }
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    /// Receives a frame from the socket asynchronously.
    /// Returns `Poll::Pending` if the socket cannot be read from.
    pub fn poll_recv(
        &mut self,
        cx: &mut Context<'_>,
        frame: &mut [u8],
    ) -> Poll<io::Result<(usize, sockets::Addr)>> {
        ready!(self.poll_can_rx(cx))?;
        match self.sock.get_mut().recv(frame) {
            Ok(x) => Poll::Ready(Ok(x)),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                self.sock.clear_read_ready(cx, Ready::readable())?;
                Poll::Pending
            }
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    /// Tries to send a frame. Will return `WouldBlock` if the socket cannot
    /// send the frame.
    pub fn try_send(&mut self, frame: &[u8]) -> io::Result<usize> {
        self.sock.get_mut().send(frame)
    }

    /// Tries to receive a frame. Will return `WouldBlock` if no frame is
    /// available.
    pub fn try_recv(&mut self, frame: &mut [u8]) -> io::Result<(usize, sockets::Addr)> {
        self.sock.get_mut().recv(frame)
    }

    /// Returns a `Future` that calls [`poll_send`](), enabling use of async/await.
    pub fn send<'a>(&'a mut self, frame: &'a [u8]) -> impl Future<Output = io::Result<usize>> + 'a {
        SendFuture { sock: self, frame }
    }

    /// Returns a `Future` that calls [`poll_recv`](), enabling use of async/await.
    pub fn recv<'a>(
        &'a mut self,
        frame: &'a mut [u8],
    ) -> impl Future<Output = io::Result<(usize, sockets::Addr)>> + 'a {
        RecvFuture { sock: self, frame }
    }
}

struct SendFuture<'a> {
    sock: &'a mut AsyncBoundSocket,
    frame: &'a [u8],
}

impl Unpin for SendFuture<'_> {}

impl Future for SendFuture<'_> {
    type Output = io::Result<usize>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let me = self.get_mut();
        me.sock.poll_send(cx, me.frame)
    }
}

struct RecvFuture<'a> {
    sock: &'a mut AsyncBoundSocket,
    frame: &'a mut [u8],
}

impl Unpin for RecvFuture<'_> {}

impl Future for RecvFuture<'_> {
    type Output = io::Result<(usize, sockets::Addr)>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let me = self.get_mut();
        me.sock.poll_recv(cx, me.frame)
    }
}
