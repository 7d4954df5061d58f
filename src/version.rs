use std::fmt;

/// Version of the bag format, from the line opening a bag.
///
/// This crate reads version 2.0, the format written by ROS since C Turtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
}

impl FormatVersion {
    pub const V2_0: Self = Self { major: 2, minor: 0 };

    /// Parse a version line such as `#ROSBAG V2.0`, without its terminator.
    pub fn parse(line: &str) -> Option<Self> {
        let (major, minor) = line.strip_prefix("#ROSBAG V")?.split_once('.')?;

        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
