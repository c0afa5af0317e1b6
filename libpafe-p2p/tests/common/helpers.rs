// helpers.rs: devices over a shared MockTransport

use std::cell::RefCell;
use std::rc::Rc;

use libpafe_p2p::protocol::Frame;
use libpafe_p2p::test_support::init_replies;
use libpafe_p2p::transport::mock::MockTransport;
use libpafe_p2p::{Device, DeviceType, Initialized, Result, Transport};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Transport delegating into a MockTransport the test keeps a handle on.
pub struct SharedTransport {
    pub inner: Rc<RefCell<MockTransport>>,
}

impl Transport for SharedTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.inner.borrow_mut().send(data)
    }
    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>> {
        self.inner.borrow_mut().receive(timeout_ms)
    }
    fn device_type(&self) -> Result<DeviceType> {
        self.inner.borrow().device_type()
    }
    fn reset(&mut self) -> Result<()> {
        self.inner.borrow_mut().reset()
    }
}

/// Initialized device whose transport replays the init sequence followed by
/// `replies`.
pub fn initialized_device(replies: Vec<Vec<u8>>) -> (Rc<RefCell<MockTransport>>, Device<Initialized>) {
    init_logger();
    let inner = Rc::new(RefCell::new(MockTransport::new(DeviceType::S330)));
    for r in init_replies().into_iter().chain(replies) {
        inner.borrow_mut().push_response(r);
    }
    let transport: Box<dyn Transport> = Box::new(SharedTransport {
        inner: inner.clone(),
    });
    let dev = Device::new_with_transport(transport)
        .unwrap()
        .initialize()
        .unwrap();
    (inner, dev)
}

/// Command payloads sent after initialization, ACK frames left out.
pub fn commands_after_init(mock: &Rc<RefCell<MockTransport>>) -> Vec<Vec<u8>> {
    mock.borrow()
        .sent
        .iter()
        .filter(|f| !Frame::is_ack(f))
        .skip(4)
        .map(|f| Frame::decode(f).unwrap())
        .collect()
}
