use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

/// A decoded address in its canonical textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub version: IpVersion,
    pub text: String,
}

impl Address {
    pub fn v4(text: impl Into<String>) -> Self {
        Address {
            version: IpVersion::V4,
            text: text.into(),
        }
    }

    pub fn v6(text: impl Into<String>) -> Self {
        Address {
            version: IpVersion::V6,
            text: text.into(),
        }
    }

    /// Render as `addr:port`, bracketing IPv6 addresses.
    pub fn with_port(&self, port: u16) -> String {
        match self.version {
            IpVersion::V4 => format!("{}:{}", self.text, port),
            IpVersion::V6 => format!("[{}]:{}", self.text, port),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
