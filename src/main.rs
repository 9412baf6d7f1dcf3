//! Send one ASCII command to a DCON module and print the reply.
//!
//! Usage:
//! ```bash
//! dcon-util -d /dev/ttyUSB0 '$01M'
//! RUST_LOG=debug dcon-util '#01'
//! ```

use clap::Parser;
use dcon_util::{encode_command, open_port, DconError, PortOpener, Reply, RetryPolicy, SerialOpener, Transceiver};

#[cfg(windows)]
const DEFAULT_DEVICE: &str = "COM1";
#[cfg(not(windows))]
const DEFAULT_DEVICE: &str = "/dev/ttyACM0";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// ASCII command to send, without checksum or terminator
    #[arg(value_name = "CMD")]
    command: String,

    /// Serial device
    #[arg(short, long, default_value = DEFAULT_DEVICE)]
    device: String,
}

/// Reject an unsendable command before touching the device, then open it
/// and run the exchange.
fn run<O: PortOpener>(cli: &Cli, opener: &mut O, policy: RetryPolicy) -> Result<Reply, DconError> {
    encode_command(&cli.command)?;

    let port = open_port(opener, &cli.device, policy, |notice| {
        println!("{}", notice);
    })?;

    let mut module = Transceiver::new(port);
    module.exec(&cli.command)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    let reply = run(&cli, &mut SerialOpener, RetryPolicy::default())?;
    reply.write_report(&mut std::io::stdout().lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcon_util::{DconTransport, OpenError};

    struct NullPort;

    impl DconTransport for NullPort {
        type Error = std::io::Error;

        fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
            Ok(data.len())
        }

        fn read(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> Result<usize, Self::Error> {
            Ok(0)
        }
    }

    /// Opener for a device that is always busy; counts open attempts
    struct AlwaysBusy {
        calls: u32,
    }

    impl PortOpener for AlwaysBusy {
        type Port = NullPort;

        fn open(&mut self, _device: &str) -> Result<Self::Port, OpenError> {
            self.calls += 1;
            Err(OpenError::Busy)
        }
    }

    #[test]
    fn test_non_ascii_command_fails_before_open() {
        let cli = Cli::try_parse_from(["dcon-util", "$01Mé"]).unwrap();
        let mut opener = AlwaysBusy { calls: 0 };

        let result = run(&cli, &mut opener, RetryPolicy::default());

        assert!(matches!(result, Err(DconError::Encoding { .. })));
        assert_eq!(opener.calls, 0);
    }

    #[test]
    fn test_ascii_command_reaches_open() {
        let cli = Cli::try_parse_from(["dcon-util", "$01M"]).unwrap();
        let mut opener = AlwaysBusy { calls: 0 };
        let policy = RetryPolicy::limited(std::time::Duration::from_millis(1), 1);

        let result = run(&cli, &mut opener, policy);

        assert!(matches!(result, Err(DconError::PortBusy { attempts: 1, .. })));
        assert_eq!(opener.calls, 1);
    }

    #[test]
    fn test_command_with_default_device() {
        let cli = Cli::try_parse_from(["dcon-util", "$01M"]).unwrap();
        assert_eq!(cli.command, "$01M");
        assert_eq!(cli.device, DEFAULT_DEVICE);
    }

    #[test]
    fn test_short_device_flag() {
        let cli = Cli::try_parse_from(["dcon-util", "-d", "/dev/ttyUSB0", "#01"]).unwrap();
        assert_eq!(cli.device, "/dev/ttyUSB0");
        assert_eq!(cli.command, "#01");
    }

    #[test]
    fn test_long_device_flag() {
        let cli = Cli::try_parse_from(["dcon-util", "STATUS", "--device", "/dev/ttyS1"]).unwrap();
        assert_eq!(cli.device, "/dev/ttyS1");
        assert_eq!(cli.command, "STATUS");
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["dcon-util"]).is_err());
    }

    #[test]
    fn test_no_other_flags() {
        assert!(Cli::try_parse_from(["dcon-util", "--baud", "19200", "STATUS"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
