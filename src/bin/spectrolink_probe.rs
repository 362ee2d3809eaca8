//! Diagnostic probe: open one spectrometer and run a single query.
//!
//! Connection settings come from `spectrolink.toml`, `SPECTROLINK_*`
//! environment variables and the flags below, in increasing precedence.

#![expect(clippy::print_stdout, reason = "probe results are written to stdout")]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use spectrolink::{
    FeatureFamily,
    HelperBus,
    ProtocolFamily,
    config::{ConnectionArgs, ConnectionConfig},
    connect::open_bus,
    protocol::{
        PixelBinningProtocol,
        ProtocolHelpers,
        TemperatureProtocol,
        ThermoElectricProtocol,
        obp::{ObpPixelBinning, ObpTemperature, ObpThermoElectric},
        ipv4_helpers,
        serial_number_helpers,
        spectrometer_helpers,
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Wire protocol selector for the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WireProtocol {
    /// Framed binary protocol.
    Obp,
    /// Legacy single-opcode protocol.
    Legacy,
}

impl From<WireProtocol> for ProtocolFamily {
    fn from(value: WireProtocol) -> Self {
        match value {
            WireProtocol::Obp => Self::Obp,
            WireProtocol::Legacy => Self::Legacy,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Wire protocol the device speaks.
    #[arg(long, value_enum, default_value_t = WireProtocol::Obp)]
    protocol: WireProtocol,
    /// Pixel count of legacy spectrometers.
    #[arg(long, default_value_t = 3648)]
    pixels: usize,
    #[command(subcommand)]
    command: Probe,
}

#[derive(Subcommand, Debug)]
enum Probe {
    /// Print the serial number.
    SerialNumber,
    /// Print every board temperature sensor.
    Temperatures,
    /// Print the thermo-electric cooler temperature.
    TeTemperature,
    /// Acquire one spectrum and summarise it.
    Spectrum {
        /// Integration time to set first, in microseconds.
        #[arg(long)]
        integration_micros: Option<u32>,
    },
    /// Print the binning factor, or set it when a factor is given.
    Binning {
        /// New binning factor.
        factor: Option<u8>,
    },
    /// Print the IPv4 settings of one network interface.
    Ipv4 {
        /// Interface index.
        #[arg(long, default_value_t = 0)]
        interface: u8,
    },
}

fn init_tracing(config: &ConnectionConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn run(cli: &Cli, bus: &mut HelperBus) -> Result<()> {
    let protocol = ProtocolFamily::from(cli.protocol);
    match &cli.command {
        Probe::SerialNumber => {
            let serial = serial_number_helpers()
                .lookup(protocol)?
                .serial_number(bus)
                .context("reading serial number")?;
            println!("{serial}");
        }
        Probe::Temperatures => {
            let helpers = ProtocolHelpers::<dyn TemperatureProtocol>::new(FeatureFamily::Temperature)
                .with(Box::new(ObpTemperature));
            let readings = helpers
                .lookup(protocol)?
                .read_all_temperatures(bus)
                .context("reading temperatures")?;
            for (index, celsius) in readings.iter().enumerate() {
                println!("sensor {index}: {celsius:.2} °C");
            }
        }
        Probe::TeTemperature => {
            let helpers = ProtocolHelpers::<dyn ThermoElectricProtocol>::new(FeatureFamily::ThermoElectric)
                .with(Box::new(ObpThermoElectric));
            let celsius = helpers
                .lookup(protocol)?
                .temperature(bus)
                .context("reading cooler temperature")?;
            println!("{celsius:.2} °C");
        }
        Probe::Spectrum { integration_micros } => {
            let helpers = spectrometer_helpers(cli.pixels);
            let spectrometer = helpers.lookup(protocol)?;
            if let Some(micros) = integration_micros {
                spectrometer
                    .set_integration_time_micros(bus, *micros)
                    .context("setting integration time")?;
            }
            let pixels = spectrometer.read_raw_spectrum(bus).context("reading spectrum")?;
            let min = pixels.iter().min().copied().unwrap_or_default();
            let max = pixels.iter().max().copied().unwrap_or_default();
            println!("{} pixels, min {min}, max {max}", pixels.len());
        }
        Probe::Binning { factor } => {
            let helpers = ProtocolHelpers::<dyn PixelBinningProtocol>::new(FeatureFamily::PixelBinning)
                .with(Box::new(ObpPixelBinning));
            let binning = helpers.lookup(protocol)?;
            if let Some(new_factor) = factor {
                binning
                    .set_binning_factor(bus, *new_factor)
                    .context("setting binning factor")?;
            }
            println!("{}", binning.binning_factor(bus).context("reading binning factor")?);
        }
        Probe::Ipv4 { interface } => {
            let helpers = ipv4_helpers();
            let ipv4 = helpers.lookup(protocol)?;
            let dhcp = ipv4.dhcp_enabled(bus, *interface).context("reading DHCP state")?;
            println!("dhcp: {}", if dhcp { "on" } else { "off" });
            for assignment in ipv4.addresses(bus, *interface).context("reading addresses")? {
                println!("address: {assignment} (netmask {})", assignment.netmask());
            }
            let gateway = ipv4
                .default_gateway(bus, *interface)
                .context("reading default gateway")?;
            println!("gateway: {gateway}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConnectionConfig::load(&cli.connection).context("loading configuration")?;
    init_tracing(&config);
    info!(transport = ?config.transport, protocol = ?cli.protocol, "probing device");
    let mut bus = open_bus(&config).context("opening connection")?;
    run(&cli, &mut bus)
}
