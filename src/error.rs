use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Short read, wrong start marker or wrong response code.
    #[error("malformed response frame")]
    Malformed,
    /// Response checksum mismatch. Only reported when checksum verification is enabled.
    #[error("response checksum mismatch")]
    BadChecksum,
    /// Argument outside the range the sensor accepts.
    #[error("invalid argument")]
    InvalidArg,
    #[error("serial write failed")]
    WriteFailure,
    #[error("serial read failed")]
    ReadFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_message() {
        assert_eq!(Error::Malformed.to_string(), "malformed response frame");
        assert_eq!(Error::BadChecksum.to_string(), "response checksum mismatch");
        assert_eq!(Error::ReadFailure.to_string(), "serial read failed");
    }
}
