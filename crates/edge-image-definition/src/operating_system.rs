// crates/edge-image-definition/src/operating_system.rs
// ============================================================================
// Module: Operating System Section
// Description: Operating system customization records.
// Purpose: Describe users, services, packages, and disk options for the image.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The `operatingSystem` section customizes the installed system: kernel
//! arguments, accounts, systemd units, registration, packages, ISO/raw disk
//! options, time synchronization, proxy, and FIPS mode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Packages that must be installable when FIPS mode is enabled.
pub const FIPS_PACKAGES: &[&str] = &["patterns-base-fips"];
/// Kernel arguments that FIPS mode adds to the boot configuration.
pub const FIPS_KERNEL_ARGS: &[&str] = &["fips=1"];

/// Megabytes per gigabyte for disk size conversion.
const MB_PER_GB: u64 = 1024;
/// Megabytes per terabyte for disk size conversion.
const MB_PER_TB: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Operating System
// ============================================================================

/// Operating system customization section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OperatingSystem {
    /// Extra kernel command line arguments.
    pub kernel_args: Vec<String>,
    /// Groups to create.
    pub groups: Vec<OperatingSystemGroup>,
    /// Users to create.
    pub users: Vec<OperatingSystemUser>,
    /// Systemd units to enable or disable.
    pub systemd: Systemd,
    /// SUSE Multi-Linux Manager registration.
    pub suma: Suma,
    /// Packages and repositories to install from.
    pub packages: Packages,
    /// Options for the self-installing ISO image type.
    pub iso_configuration: IsoConfiguration,
    /// Options for the raw disk image type.
    pub raw_configuration: RawConfiguration,
    /// Timezone and NTP settings.
    pub time: Time,
    /// System-wide proxy settings.
    pub proxy: Proxy,
    /// Console keymap.
    pub keymap: String,
    /// Enables FIPS mode.
    #[serde(rename = "enableFIPS")]
    pub enable_fips: bool,
}

impl OperatingSystem {
    /// Returns true when ISO- or raw-specific configuration is declared.
    #[must_use]
    pub fn has_image_type_configuration(&self) -> bool {
        self.iso_configuration.is_populated() || self.raw_configuration.is_populated()
    }
}

/// Group account definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OperatingSystemGroup {
    /// Group name.
    pub name: String,
    /// Optional group id.
    pub gid: Option<u32>,
}

/// User account definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OperatingSystemUser {
    /// Login name.
    pub username: String,
    /// Optional user id.
    pub uid: Option<u32>,
    /// Pre-hashed password.
    pub encrypted_password: String,
    /// Authorized SSH public keys.
    pub ssh_keys: Vec<String>,
    /// Primary group name.
    pub primary_group: String,
    /// Supplementary group names.
    pub secondary_groups: Vec<String>,
    /// Creates the home directory for the user.
    pub create_home_dir: bool,
}

/// Systemd unit lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Systemd {
    /// Units to enable.
    pub enable: Vec<String>,
    /// Units to disable.
    pub disable: Vec<String>,
}

/// SUSE Multi-Linux Manager registration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Suma {
    /// Manager host name, without a URL scheme.
    pub host: String,
    /// Activation key for the registration.
    pub activation_key: String,
}

impl Suma {
    /// Returns true when any registration field is set.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.host.is_empty() || !self.activation_key.is_empty()
    }
}

/// Package installation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Packages {
    /// Disables GPG checks for package installation.
    #[serde(rename = "noGPGCheck")]
    pub no_gpg_check: bool,
    /// Enables the extras repository.
    pub enable_extras: bool,
    /// Packages to install.
    #[serde(rename = "packageList")]
    pub package_list: Vec<String>,
    /// Repositories added for package resolution.
    pub additional_repos: Vec<AdditionalRepository>,
    /// SUSE Customer Center registration code.
    #[serde(rename = "sccRegistrationCode")]
    pub registration_code: String,
}

/// Additional package repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdditionalRepository {
    /// Repository URL.
    pub url: String,
    /// Marks the repository as unsigned.
    pub unsigned: bool,
}

/// Options for the self-installing ISO image type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct IsoConfiguration {
    /// Device the ISO installs onto.
    pub install_device: String,
}

impl IsoConfiguration {
    /// Returns true when any ISO option is set.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.install_device.is_empty()
    }
}

/// Options for the raw disk image type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawConfiguration {
    /// Target disk size.
    pub disk_size: DiskSize,
    /// Encryption key for an encrypted raw image.
    pub luks_key: String,
    /// Expands the encrypted partition on first boot.
    pub expand_encrypted_partition: bool,
}

impl RawConfiguration {
    /// Returns true when any raw option is set.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.disk_size.is_empty() || !self.luks_key.is_empty() || self.expand_encrypted_partition
    }
}

/// Disk size written as a positive integer followed by `M`, `G`, or `T`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DiskSize(pub String);

impl DiskSize {
    /// Returns true when no size is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when the size matches `<positive integer><M|G|T>`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.split().is_some()
    }

    /// Converts a valid size to megabytes.
    ///
    /// Returns `None` for invalid sizes or on overflow.
    #[must_use]
    pub fn to_megabytes(&self) -> Option<u64> {
        let (digits, unit) = self.split()?;
        let quantity = digits.parse::<u64>().ok()?;
        match unit {
            'M' => Some(quantity),
            'G' => quantity.checked_mul(MB_PER_GB),
            'T' => quantity.checked_mul(MB_PER_TB),
            _ => None,
        }
    }

    /// Splits the size into its digit run and unit suffix.
    fn split(&self) -> Option<(&str, char)> {
        let value = self.0.as_str();
        let unit = value.chars().last()?;
        if !matches!(unit, 'M' | 'G' | 'T') {
            return None;
        }
        let digits = &value[..value.len() - unit.len_utf8()];
        if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some((digits, unit))
    }
}

/// Timezone and NTP settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Time {
    /// Timezone name.
    pub timezone: String,
    /// NTP synchronization settings.
    #[serde(rename = "ntp")]
    pub ntp_configuration: NtpConfiguration,
}

/// NTP synchronization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NtpConfiguration {
    /// Blocks boot until time is synchronized.
    pub force_wait: bool,
    /// NTP pools.
    pub pools: Vec<String>,
    /// NTP servers.
    pub servers: Vec<String>,
}

impl NtpConfiguration {
    /// Returns true when at least one pool or server is configured.
    #[must_use]
    pub fn has_time_source(&self) -> bool {
        !self.pools.is_empty() || !self.servers.is_empty()
    }
}

/// System-wide proxy settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Proxy {
    /// HTTP proxy URL.
    pub http_proxy: String,
    /// HTTPS proxy URL.
    pub https_proxy: String,
    /// Hosts that bypass the proxy.
    pub no_proxy: Vec<String>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
