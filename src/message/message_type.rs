//! Catalog of message-type opcodes.
//!
//! Opcodes are fixed by device firmware. The upper 16 bits group them by
//! capability area; codes not listed here round-trip through
//! [`MessageType::Other`].

use std::fmt;

macro_rules! message_types {
    ($( $(#[$doc:meta])* $name:ident = $code:literal, )+) => {
        /// Known message-type opcodes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MessageType {
            $( $(#[$doc])* $name, )+
            /// Any opcode not explicitly covered.
            Other(u32),
        }

        impl From<u32> for MessageType {
            fn from(v: u32) -> Self {
                match v {
                    $( $code => Self::$name, )+
                    other => Self::Other(other),
                }
            }
        }

        impl From<MessageType> for u32 {
            fn from(t: MessageType) -> Self {
                match t {
                    $( MessageType::$name => $code, )+
                    MessageType::Other(v) => v,
                }
            }
        }

        impl fmt::Display for MessageType {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Self::$name => write!(f, "{}({:#010x})", stringify!($name), $code), )+
                    Self::Other(v) => write!(f, "Other({v:#010x})"),
                }
            }
        }
    };
}

message_types! {
    // device identity
    /// Reset the device.
    Reset = 0x0000_0000,
    /// Restore factory defaults.
    ResetDefaults = 0x0000_0001,
    /// Read the hardware revision byte.
    GetHardwareRevision = 0x0000_0080,
    /// Read the firmware revision word.
    GetFirmwareRevision = 0x0000_0090,
    /// Read the serial number string.
    GetSerialNumber = 0x0000_0100,
    /// Read the maximum serial number length.
    GetSerialNumberMaxLength = 0x0000_0101,
    /// Read the user-assigned device alias.
    GetDeviceAlias = 0x0000_0200,
    /// Read the maximum alias length.
    GetDeviceAliasMaxLength = 0x0000_0201,
    /// Store a new device alias.
    SetDeviceAlias = 0x0000_0210,
    /// Read the number of user string slots.
    GetUserStringCount = 0x0000_0300,
    /// Read the maximum user string length.
    GetUserStringMaxLength = 0x0000_0301,
    /// Read one user string.
    GetUserString = 0x0000_0302,
    /// Store one user string.
    SetUserString = 0x0000_0310,

    // serial interface
    /// Read the RS232 baud rate.
    GetRs232BaudRate = 0x0000_0800,
    /// Read the RS232 flow control mode.
    GetRs232FlowControl = 0x0000_0804,
    /// Change the RS232 baud rate.
    SetRs232BaudRate = 0x0000_0810,
    /// Change the RS232 flow control mode.
    SetRs232FlowControl = 0x0000_0814,
    /// Persist RS232 settings.
    SaveRs232Settings = 0x0000_08F0,
    /// Configure the status LED.
    ConfigureStatusLed = 0x0000_1010,
    /// Enter firmware reprogramming mode.
    ReprogrammingMode = 0x000F_FF00,

    // buffering
    /// Abort an acquisition in progress.
    AbortAcquisition = 0x0010_0000,
    /// Read the spectrum buffer capacity.
    GetBufferedSpectrumMaxCount = 0x0010_0800,
    /// Set the spectrum buffer capacity.
    SetBufferedSpectrumMaxCount = 0x0010_0810,
    /// Discard buffered spectra.
    ClearBufferedSpectra = 0x0010_0830,
    /// Read the number of buffered spectra.
    GetBufferedSpectrumCount = 0x0010_0900,
    /// Start acquiring spectra into the buffer.
    AcquireSpectraIntoBuffer = 0x0010_0902,
    /// Read one buffered spectrum.
    GetBufferedSpectrum = 0x0010_0928,

    // acquisition
    /// Acquire and return a corrected spectrum.
    GetCorrectedSpectrumNow = 0x0010_1000,
    /// Acquire and return a raw spectrum.
    GetRawSpectrumNow = 0x0010_1100,
    /// Acquire and return a partial spectrum.
    GetPartialSpectrumNow = 0x0010_2080,

    // integration time and trigger mode
    /// Set the integration time in microseconds.
    SetIntegrationTimeMicros = 0x0011_0010,
    /// Set the trigger mode.
    SetTriggerMode = 0x0011_0110,
    /// Simulate an external trigger pulse.
    SimulateTriggerPulse = 0x0011_0120,

    // pixel binning
    /// Read the current pixel binning factor.
    GetPixelBinningFactor = 0x0011_0280,
    /// Read the largest supported binning factor.
    GetMaxBinningFactor = 0x0011_0281,
    /// Read the power-on binning factor.
    GetDefaultBinningFactor = 0x0011_0285,
    /// Set the current pixel binning factor.
    SetPixelBinningFactor = 0x0011_0290,
    /// Set (or with no payload, reset) the power-on binning factor.
    SetDefaultBinningFactor = 0x0011_0295,

    /// Switch the lamp output.
    SetLampEnable = 0x0011_0410,
    /// Set the trigger delay in microseconds.
    SetTriggerDelayMicros = 0x0011_0510,
    /// Set the number of scans to average.
    SetScansToAverage = 0x0012_0010,
    /// Set the boxcar smoothing width.
    SetBoxcarWidth = 0x0012_1010,

    // calibration
    /// Read the number of wavelength coefficients.
    GetWavelengthCoeffCount = 0x0018_0100,
    /// Read one wavelength coefficient.
    GetWavelengthCoeff = 0x0018_0101,
    /// Store one wavelength coefficient.
    SetWavelengthCoeff = 0x0018_0111,
    /// Read the number of nonlinearity coefficients.
    GetNonlinearityCoeffCount = 0x0018_1100,
    /// Read one nonlinearity coefficient.
    GetNonlinearityCoeff = 0x0018_1101,
    /// Store one nonlinearity coefficient.
    SetNonlinearityCoeff = 0x0018_1111,
    /// Read the full irradiance calibration.
    GetIrradianceCalibration = 0x0018_2001,
    /// Read the irradiance calibration length.
    GetIrradianceCalibrationCount = 0x0018_2002,
    /// Read the irradiance collection area.
    GetIrradianceCollectionArea = 0x0018_2003,
    /// Store the full irradiance calibration.
    SetIrradianceCalibration = 0x0018_2011,
    /// Store the irradiance collection area.
    SetIrradianceCollectionArea = 0x0018_2013,
    /// Read the number of stray light coefficients.
    GetStrayLightCoeffCount = 0x0018_3100,
    /// Read one stray light coefficient.
    GetStrayLightCoeff = 0x0018_3101,
    /// Store one stray light coefficient.
    SetStrayLightCoeff = 0x0018_3111,
    /// Read the hot pixel index list.
    GetHotPixelIndices = 0x0018_6000,
    /// Store the hot pixel index list.
    SetHotPixelIndices = 0x0018_6010,

    // optical bench
    /// Read the optical bench identifier.
    GetBenchId = 0x001B_0000,
    /// Read the optical bench serial number.
    GetBenchSerialNumber = 0x001B_0100,
    /// Read the slit width in microns.
    GetBenchSlitWidth = 0x001B_0200,
    /// Read the fiber diameter in microns.
    GetBenchFiberDiameter = 0x001B_0300,
    /// Read the grating description.
    GetBenchGrating = 0x001B_0400,
    /// Read the filter description.
    GetBenchFilter = 0x001B_0500,
    /// Read the coating description.
    GetBenchCoating = 0x001B_0600,

    // GPIO
    /// Read the number of GPIO pins.
    GetGpioPinCount = 0x0020_0000,
    /// Read the output-enable vector.
    GetGpioOutputEnable = 0x0020_0100,
    /// Write the output-enable vector under a mask.
    SetGpioOutputEnable = 0x0020_0110,
    /// Read the pin value vector.
    GetGpioValue = 0x0020_0300,
    /// Write the pin value vector under a mask.
    SetGpioValue = 0x0020_0310,

    // strobe
    /// Set the single strobe pulse delay.
    SetSingleStrobeDelay = 0x0030_0010,
    /// Set the single strobe pulse width.
    SetSingleStrobeWidth = 0x0030_0011,
    /// Enable or disable the single strobe.
    SetSingleStrobeEnable = 0x0030_0012,
    /// Set the continuous strobe period.
    SetContinuousStrobePeriod = 0x0031_0010,
    /// Enable or disable the continuous strobe.
    SetContinuousStrobeEnable = 0x0031_0011,

    // temperature
    /// Read the number of temperature sensors.
    GetTemperatureCount = 0x0040_0000,
    /// Read one temperature sensor.
    GetTemperature = 0x0040_0001,
    /// Read all temperature sensors.
    GetAllTemperatures = 0x0040_0002,

    // thermo-electric cooler
    /// Read whether the cooler is enabled.
    GetTecEnable = 0x0042_0000,
    /// Read the cooler setpoint.
    GetTecSetpoint = 0x0042_0001,
    /// Read whether the cooler fan is enabled.
    GetTecFanEnable = 0x0042_0002,
    /// Read whether the cooler has stabilised.
    GetTecStable = 0x0042_0003,
    /// Read the cooler temperature.
    GetTecTemperature = 0x0042_0004,
    /// Enable or disable the cooler.
    SetTecEnable = 0x0042_0010,
    /// Change the cooler setpoint.
    SetTecSetpoint = 0x0042_0011,
    /// Enable or disable the cooler fan.
    SetTecFanEnable = 0x0042_0012,

    // network interfaces
    /// Read the number of network interfaces.
    GetNetworkInterfaceCount = 0x0080_0100,
    /// Read the link type of one interface.
    GetNetworkInterfaceType = 0x0080_0101,
    /// Read whether one interface is enabled.
    GetNetworkInterfaceEnable = 0x0080_0102,
    /// Run the self test of one interface.
    RunNetworkInterfaceSelfTest = 0x0080_0103,
    /// Enable or disable one interface.
    SetNetworkInterfaceEnable = 0x0080_0110,
    /// Persist the settings of one interface.
    SaveNetworkInterfaceSettings = 0x0080_01F0,

    // ethernet
    /// Read the MAC address of one interface.
    GetMacAddress = 0x0080_0500,
    /// Change the MAC address of one interface.
    SetMacAddress = 0x0080_0510,

    // IPv4
    /// Read whether DHCP configures an interface.
    GetIpv4DhcpEnable = 0x0080_0F00,
    /// Read the number of static addresses on an interface.
    GetIpv4AddressCount = 0x0080_0F01,
    /// Read one static address and its prefix length.
    GetIpv4Address = 0x0080_0F02,
    /// Read the default gateway of an interface.
    GetIpv4DefaultGateway = 0x0080_0F03,
    /// Enable or disable DHCP on an interface.
    SetIpv4DhcpEnable = 0x0080_0F10,
    /// Change the default gateway of an interface.
    SetIpv4DefaultGateway = 0x0080_0F13,
    /// Add a static address to an interface.
    AddIpv4Address = 0x0080_0F20,
    /// Remove a static address from an interface.
    DeleteIpv4Address = 0x0080_0F21,

    // light source
    /// Read whether a light source is enabled.
    GetLightSourceEnable = 0x0081_0021,
    /// Enable or disable a light source.
    SetLightSourceEnable = 0x0081_0031,
    /// Read a light source intensity.
    GetLightSourceIntensity = 0x0081_0041,
    /// Change a light source intensity.
    SetLightSourceIntensity = 0x0081_0051,

    // I2C master
    /// Read the number of I2C buses.
    GetI2cBusCount = 0x00D0_0000,
    /// Limit the clock rate of one I2C bus.
    SetI2cClockLimit = 0x00D0_0010,
    /// Read bytes from a device on an I2C bus.
    ReadI2cBus = 0x00D0_0080,
    /// Write bytes to a device on an I2C bus.
    WriteI2cBus = 0x00D0_0180,

    // SPI master
    /// Read the number of SPI buses.
    GetSpiBusCount = 0x00D1_0000,
    /// Set the clock rate of one SPI bus.
    SetSpiClockRate = 0x00D1_0010,
    /// Full-duplex transfer on one SPI bus.
    TransferSpiBus = 0x00D1_0080,
}

impl MessageType {
    /// Raw opcode value.
    #[must_use]
    pub fn code(self) -> u32 { self.into() }
}
