use crate::error::{Error, Result};

/// Size in bytes of every encoded record.
pub const RECORD_LEN: usize = 16;

/// Record kind carried in the first four bytes of a datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Command {
    SendValue = 0,
}

impl Command {
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Command {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Self::SendValue),
            other => Err(Error::MalformedRecord {
                reason: format!("unknown command {other}"),
            }),
        }
    }
}

/// One counter observation: `command(4) || key(4) || value(8)`, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterRecord {
    pub command: Command,
    pub key: u32,
    pub value: i64,
}

impl CounterRecord {
    pub const fn new(key: u32, value: i64) -> Self {
        Self {
            command: Command::SendValue,
            key,
            value,
        }
    }

    /// Builds a record from wider integer inputs, rejecting anything that
    /// does not fit the wire fields.
    pub fn try_new<K, V>(key: K, value: V) -> Result<Self>
    where
        K: TryInto<u32>,
        V: TryInto<i64>,
    {
        let key = key.try_into().map_err(|_| Error::Encoding {
            field: "key",
            reason: "value does not fit in an unsigned 32-bit integer".to_string(),
        })?;
        let value = value.try_into().map_err(|_| Error::Encoding {
            field: "value",
            reason: "value does not fit in a signed 64-bit integer".to_string(),
        })?;
        Ok(Self::new(key, value))
    }

    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0..4].copy_from_slice(&self.command.code().to_be_bytes());
        buf[4..8].copy_from_slice(&self.key.to_be_bytes());
        buf[8..16].copy_from_slice(&self.value.to_be_bytes());
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        let buf: &[u8; RECORD_LEN] = buf.try_into().map_err(|_| Error::MalformedRecord {
            reason: format!("expected {RECORD_LEN} bytes, got {}", buf.len()),
        })?;

        let mut command = [0u8; 4];
        let mut key = [0u8; 4];
        let mut value = [0u8; 8];
        command.copy_from_slice(&buf[0..4]);
        key.copy_from_slice(&buf[4..8]);
        value.copy_from_slice(&buf[8..16]);

        Ok(Self {
            command: Command::try_from(u32::from_be_bytes(command))?,
            key: u32::from_be_bytes(key),
            value: i64::from_be_bytes(value),
        })
    }
}
