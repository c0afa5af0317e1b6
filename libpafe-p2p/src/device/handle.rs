// libpafe-p2p/src/device/handle.rs

use std::marker::PhantomData;

use crate::constants::{RFCONFIG_RETRIES, RFCONFIG_TIMEOUTS, TARGET_SYSTEM_CODE};
use crate::pcd::Pcd;
use crate::protocol::codec;
use crate::protocol::{Command, Frame, GeneralStatus, Response, TargetActivation};
use crate::transport::Transport;
use crate::types::{ActPass, BaudRate, DeviceType, NfcId3};
use crate::utils::DEFAULT_READ_TIMEOUT_MS;
use crate::{Error, Result};

/// Time allowed for the chip to acknowledge a command frame
const ACK_TIMEOUT_MS: u64 = 100;

/// Type-state markers
pub struct Uninitialized;
pub struct Initialized;

/// RC-S956 handle that enforces initialization state at compile time.
pub struct Device<State = Uninitialized> {
    transport: Box<dyn Transport>,
    device_type: DeviceType,
    timeout_ms: u64,
    target_timeout_ms: u64,
    _state: PhantomData<State>,
}

impl<S> Device<S> {
    /// Inspect the detected device type.
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    fn into_state<T>(self) -> Device<T> {
        Device {
            transport: self.transport,
            device_type: self.device_type,
            timeout_ms: self.timeout_ms,
            target_timeout_ms: self.target_timeout_ms,
            _state: PhantomData,
        }
    }
}

impl Device<Uninitialized> {
    /// Create a Device from an existing Transport instance. This is
    /// primarily intended for tests where a MockTransport is provided.
    pub fn new_with_transport(transport: Box<dyn Transport>) -> Result<Self> {
        let device_type = transport.device_type()?;
        Ok(Self {
            transport,
            device_type,
            timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            target_timeout_ms: 0,
            _state: PhantomData,
        })
    }

    /// Response timeout for data exchanges in milliseconds.
    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    /// Timeout while waiting as a target; 0 waits forever.
    pub fn set_target_timeout_ms(&mut self, timeout_ms: u64) {
        self.target_timeout_ms = timeout_ms;
    }

    /// Reset the transport, configure RF timeouts and retries, soft reset
    /// the chip and leave the RF field off.
    pub fn initialize(mut self) -> Result<Device<Initialized>> {
        self.transport.reset()?;

        let mut dev: Device<Initialized> = self.into_state();
        // ATR_RES and non-DEP exchanges without chip-side timeout
        dev.execute(
            &Command::RfConfiguration {
                item: RFCONFIG_TIMEOUTS,
                data: vec![0x00, 0x00, 0x00],
            },
            DEFAULT_READ_TIMEOUT_MS,
        )?;
        // ATR_REQ, PSL_REQ and passive polling are tried once
        dev.execute(
            &Command::RfConfiguration {
                item: RFCONFIG_RETRIES,
                data: vec![0x00, 0x00, 0x00],
            },
            DEFAULT_READ_TIMEOUT_MS,
        )?;
        dev.reset()?;
        dev.rf_off()?;
        log::debug!("{:?} initialized", dev.device_type);
        Ok(dev)
    }
}

impl Device<Initialized> {
    /// Send one command frame, wait for the ACK frame, then receive and
    /// decode the response.
    pub fn execute(&mut self, cmd: &Command, timeout_ms: u64) -> Result<Response> {
        let framed = codec::encode_command_frame(cmd)?;
        #[cfg(feature = "diagnostics")]
        log::trace!("cmd [{}]", crate::utils::HexDump::spaced(&framed));
        self.transport.send(&framed)?;

        let ack = self.transport.receive(ACK_TIMEOUT_MS)?;
        if !Frame::is_ack(&ack) {
            self.abort();
            return Err(Error::FrameFormat(format!(
                "no ack for command {:#04x}",
                cmd.command_code()
            )));
        }

        let raw = match self.transport.receive(timeout_ms) {
            Ok(raw) => raw,
            Err(e) => {
                // abort the command still running in the chip
                self.abort();
                return Err(e);
            }
        };
        #[cfg(feature = "diagnostics")]
        log::trace!("res [{}]", crate::utils::HexDump::spaced(&raw));

        let payload = match Frame::decode(&raw) {
            Ok(p) => p,
            Err(e) => {
                self.abort();
                return Err(e);
            }
        };
        Response::decode(cmd.command_code(), &payload)
    }

    fn execute_done(&mut self, cmd: Command) -> Result<()> {
        let timeout = self.timeout_ms;
        match self.execute(&cmd, timeout)? {
            Response::Done => Ok(()),
            other => Err(unexpected(&cmd, &other)),
        }
    }

    fn execute_data(&mut self, cmd: Command, timeout_ms: u64) -> Result<Vec<u8>> {
        match self.execute(&cmd, timeout_ms)? {
            Response::Data(d) => Ok(d),
            Response::JumpForDep { atr_res } => Ok(atr_res),
            other => Err(unexpected(&cmd, &other)),
        }
    }

    fn abort(&mut self) {
        if let Err(e) = self.transport.cancel() {
            log::warn!("command abort failed: {}", e);
        }
    }

    /// Hand back the transport, e.g. to reopen the device later.
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }
}

fn unexpected(cmd: &Command, resp: &Response) -> Error {
    Error::FrameFormat(format!(
        "command {:#04x} answered with {:?}",
        cmd.command_code(),
        resp
    ))
}

impl Pcd for Device<Initialized> {
    fn in_jump_for_dep(
        &mut self,
        act_pass: ActPass,
        baud_rate: BaudRate,
        nfcid3: Option<&NfcId3>,
        general_bytes: &[u8],
    ) -> Result<Vec<u8>> {
        let cmd = Command::InJumpForDep {
            act_pass,
            baud_rate,
            nfcid3: nfcid3.copied(),
            general_bytes: general_bytes.to_vec(),
        };
        let timeout = self.timeout_ms;
        self.execute_data(cmd, timeout)
    }

    fn in_data_exchange(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let timeout = self.timeout_ms;
        self.execute_data(
            Command::InDataExchange {
                data: data.to_vec(),
            },
            timeout,
        )
    }

    fn in_release(&mut self) -> Result<()> {
        self.execute_done(Command::InRelease)
    }

    fn tg_init_as_target(&mut self, nfcid3: &NfcId3, general_bytes: &[u8]) -> Result<TargetActivation> {
        let cmd = Command::TgInitAsTarget {
            nfcid3: *nfcid3,
            system_code: TARGET_SYSTEM_CODE,
            general_bytes: general_bytes.to_vec(),
        };
        let timeout = self.target_timeout_ms;
        match self.execute(&cmd, timeout)? {
            Response::TargetActivated(t) => Ok(t),
            other => Err(unexpected(&cmd, &other)),
        }
    }

    fn tg_response_to_initiator(&mut self, data: &[u8]) -> Result<()> {
        self.execute_done(Command::TgResponseToInitiator {
            data: data.to_vec(),
        })
    }

    fn tg_get_data(&mut self) -> Result<Vec<u8>> {
        let timeout = self.target_timeout_ms;
        self.execute_data(Command::TgGetData, timeout)
    }

    fn tg_set_data(&mut self, data: &[u8]) -> Result<()> {
        self.execute_done(Command::TgSetData {
            data: data.to_vec(),
        })
    }

    fn tg_set_general_bytes(&mut self, general_bytes: &[u8]) -> Result<()> {
        self.execute_done(Command::TgSetGeneralBytes {
            general_bytes: general_bytes.to_vec(),
        })
    }

    fn get_general_status(&mut self) -> Result<GeneralStatus> {
        let cmd = Command::GetGeneralStatus;
        let timeout = self.timeout_ms;
        match self.execute(&cmd, timeout)? {
            Response::GeneralStatus(st) => Ok(st),
            other => Err(unexpected(&cmd, &other)),
        }
    }

    fn set_parameters(&mut self, flags: u8) -> Result<()> {
        self.execute_done(Command::SetParameters { flags })
    }

    fn write_register(&mut self, registers: &[(u16, u8)]) -> Result<()> {
        self.execute_done(Command::WriteRegister {
            registers: registers.to_vec(),
        })
    }

    fn reset(&mut self) -> Result<()> {
        self.execute_done(Command::Reset)?;
        // The reset is carried out once the host acknowledges the response.
        self.transport.cancel()?;
        std::thread::sleep(crate::utils::ms(10));
        Ok(())
    }

    fn rf_off(&mut self) -> Result<()> {
        self.execute_done(Command::RfConfiguration {
            item: crate::constants::RFCONFIG_FIELD,
            data: vec![0x00],
        })
    }
}
