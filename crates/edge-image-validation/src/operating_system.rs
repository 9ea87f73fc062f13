// crates/edge-image-validation/src/operating_system.rs
// ============================================================================
// Module: Operating System Validation
// Description: Rules for the operatingSystem section.
// Purpose: Catch account, service, package, and disk option mistakes.
// Dependencies: edge-image-definition
// ============================================================================

//! ## Overview
//! Every rule family runs independently and appends to the same list, so one
//! broken area never hides another. Image-type-specific options (`installDevice`,
//! `luksKey`, `expandEncryptedPartition`) are checked against the image type
//! only when the document has an image section.

// ============================================================================
// SECTION: Imports
// ============================================================================

use edge_image_definition::FIPS_KERNEL_ARGS;
use edge_image_definition::FIPS_PACKAGES;
use edge_image_definition::IMAGE_TYPE_ISO;
use edge_image_definition::IMAGE_TYPE_RAW;
use edge_image_definition::Image;
use edge_image_definition::OperatingSystem;
use edge_image_definition::OperatingSystemGroup;
use edge_image_definition::OperatingSystemUser;
use edge_image_definition::Packages;
use edge_image_definition::RawConfiguration;
use edge_image_definition::Suma;
use edge_image_definition::Systemd;
use edge_image_definition::Time;

use crate::duplicates::find_duplicates;
use crate::failure::Failure;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Validates the operating system section.
///
/// `image` is `None` for front ends without an image section.
#[must_use]
pub fn validate_operating_system(os: &OperatingSystem, image: Option<&Image>) -> Vec<Failure> {
    let mut failures = Vec::new();
    failures.extend(validate_kernel_args(&os.kernel_args));
    failures.extend(validate_systemd(&os.systemd));
    failures.extend(validate_groups(&os.groups));
    failures.extend(validate_users(&os.users));
    failures.extend(validate_suma(&os.suma));
    failures.extend(validate_packages(&os.packages));
    failures.extend(validate_fips(os));
    failures.extend(validate_iso_configuration(os, image));
    failures.extend(validate_raw_configuration(&os.raw_configuration, image));
    failures.extend(validate_time(&os.time));
    failures
}

// ============================================================================
// SECTION: Kernel Arguments
// ============================================================================

/// Validates kernel arguments.
///
/// Each entry must be `key=value` with both parts non-empty. Keys of
/// well-formed entries must be unique.
#[must_use]
pub fn validate_kernel_args(args: &[String]) -> Vec<Failure> {
    let mut failures = Vec::new();
    let mut keys = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => keys.push(key),
            _ => failures.push(Failure::new("Kernel arguments must be specified as 'key=value'.")),
        }
    }
    for key in find_duplicates(keys) {
        failures.push(Failure::new(format!("Duplicate kernel argument found: {key}")));
    }
    if args.iter().any(|arg| FIPS_KERNEL_ARGS.contains(&arg.as_str())) {
        failures.push(Failure::new(
            "FIPS mode has been specified via kernel arguments, please use the 'enableFIPS: true' \
             option instead.",
        ));
    }
    failures
}

// ============================================================================
// SECTION: Systemd
// ============================================================================

/// Validates systemd enable and disable lists.
#[must_use]
pub fn validate_systemd(systemd: &Systemd) -> Vec<Failure> {
    let mut failures = Vec::new();
    let enabled = find_duplicates(systemd.enable.iter().map(String::as_str));
    if !enabled.is_empty() {
        failures.push(Failure::new(format!(
            "Systemd enable list contains duplicate entries: {}",
            enabled.join(", ")
        )));
    }
    let disabled = find_duplicates(systemd.disable.iter().map(String::as_str));
    if !disabled.is_empty() {
        failures.push(Failure::new(format!(
            "Systemd disable list contains duplicate entries: {}",
            disabled.join(", ")
        )));
    }
    let mut reported: Vec<&str> = Vec::new();
    for unit in &systemd.enable {
        if systemd.disable.contains(unit) && !reported.contains(&unit.as_str()) {
            reported.push(unit);
            failures.push(Failure::new(format!(
                "Systemd conflict found, '{unit}' is both enabled and disabled."
            )));
        }
    }
    failures
}

// ============================================================================
// SECTION: Accounts
// ============================================================================

/// Validates group definitions.
#[must_use]
pub fn validate_groups(groups: &[OperatingSystemGroup]) -> Vec<Failure> {
    let mut failures = Vec::new();
    if groups.iter().any(|group| group.name.is_empty()) {
        failures.push(Failure::new("The 'name' field is required for all entries under 'groups'."));
    }
    let names = groups.iter().map(|group| group.name.as_str()).filter(|name| !name.is_empty());
    for name in find_duplicates(names) {
        failures.push(Failure::new(format!("Duplicate group name found: {name}")));
    }
    failures
}

/// Validates user definitions.
#[must_use]
pub fn validate_users(users: &[OperatingSystemUser]) -> Vec<Failure> {
    let mut failures = Vec::new();
    if users.iter().any(|user| user.username.is_empty()) {
        failures
            .push(Failure::new("The 'username' field is required for all entries under 'users'."));
    }
    for user in users {
        if user.encrypted_password.is_empty() && user.ssh_keys.is_empty() {
            failures.push(Failure::new(format!(
                "User '{}' must have either a password or at least one SSH key.",
                user.username
            )));
        }
    }
    let names = users.iter().map(|user| user.username.as_str()).filter(|name| !name.is_empty());
    for name in find_duplicates(names) {
        failures.push(Failure::new(format!("Duplicate username found: {name}")));
    }
    if users.iter().any(|user| !user.ssh_keys.is_empty() && !user.create_home_dir) {
        failures.push(Failure::new(
            "The 'createHomeDir' attribute must be set to 'true' if at least one SSH key is \
             specified.",
        ));
    }
    failures
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Validates the SUMA registration section; an empty section is valid.
#[must_use]
pub fn validate_suma(suma: &Suma) -> Vec<Failure> {
    let mut failures = Vec::new();
    if !suma.is_populated() {
        return failures;
    }
    if suma.host.is_empty() {
        failures.push(Failure::new("The 'host' field is required for the 'suma' section."));
    } else if suma.host.starts_with("http://") || suma.host.starts_with("https://") {
        failures.push(Failure::new("The suma 'host' field may not contain 'http://' or 'https://'"));
    }
    if suma.activation_key.is_empty() {
        failures.push(Failure::new("The 'activationKey' field is required for the 'suma' section."));
    }
    failures
}

// ============================================================================
// SECTION: Packages
// ============================================================================

/// Validates package lists and additional repositories.
#[must_use]
pub fn validate_packages(packages: &Packages) -> Vec<Failure> {
    let mut failures = Vec::new();
    if packages.package_list.iter().any(String::is_empty) {
        failures.push(Failure::new("The 'packageList' field cannot contain empty values."));
    }
    let names = packages.package_list.iter().map(String::as_str).filter(|name| !name.is_empty());
    let duplicates = find_duplicates(names);
    if !duplicates.is_empty() {
        failures.push(Failure::new(format!(
            "The 'packageList' field contains duplicate packages: {}",
            duplicates.join(", ")
        )));
    }
    if packages.additional_repos.iter().any(|repo| repo.url.is_empty()) {
        failures.push(Failure::new(
            "The 'url' field is required for all entries under 'additionalRepos'.",
        ));
    }
    let urls =
        packages.additional_repos.iter().map(|repo| repo.url.as_str()).filter(|url| !url.is_empty());
    let duplicates = find_duplicates(urls);
    if !duplicates.is_empty() {
        failures.push(Failure::new(format!(
            "The 'additionalRepos' field contains duplicate repos: {}",
            duplicates.join(", ")
        )));
    }
    failures
}

/// Validates that FIPS mode can source its packages.
#[must_use]
pub fn validate_fips(os: &OperatingSystem) -> Vec<Failure> {
    if !os.enable_fips
        || !os.packages.registration_code.is_empty()
        || !os.packages.additional_repos.is_empty()
    {
        return Vec::new();
    }
    vec![Failure::new(format!(
        "To enable FIPS you must either provide an SCC registration code or link an additional \
         repository that contains the `{}` package.",
        FIPS_PACKAGES.join("`, `")
    ))]
}

// ============================================================================
// SECTION: Image Type Options
// ============================================================================

/// Validates ISO-only options against the image type.
#[must_use]
pub fn validate_iso_configuration(os: &OperatingSystem, image: Option<&Image>) -> Vec<Failure> {
    let Some(image) = image else {
        return Vec::new();
    };
    if os.iso_configuration.install_device.is_empty() || image.is_iso() {
        return Vec::new();
    }
    vec![Failure::new(format!(
        "The 'isoConfiguration/installDevice' field can only be used when 'imageType' is \
         '{IMAGE_TYPE_ISO}'."
    ))]
}

/// Validates raw-only options: disk size format and encryption settings.
#[must_use]
pub fn validate_raw_configuration(raw: &RawConfiguration, image: Option<&Image>) -> Vec<Failure> {
    let mut failures = Vec::new();
    if !raw.disk_size.is_empty() && !raw.disk_size.is_valid() {
        failures.push(Failure::new(
            "The 'diskSize' field must be an integer followed by a suffix of either 'M', 'G', or \
             'T'.",
        ));
    }
    let raw_type_mismatch = image.is_some_and(|image| !image.is_raw());
    if !raw.luks_key.is_empty() && raw_type_mismatch {
        failures.push(Failure::new(format!(
            "The 'luksKey' field should only be defined for '{IMAGE_TYPE_RAW}' encrypted images."
        )));
    }
    if raw.expand_encrypted_partition {
        if raw_type_mismatch {
            failures.push(Failure::new(format!(
                "The 'expandEncryptedPartition' field can only be defined for '{IMAGE_TYPE_RAW}' \
                 encrypted images."
            )));
        } else if raw.luks_key.is_empty() {
            failures.push(Failure::new(
                "The 'expandEncryptedPartition' field cannot be 'true' when 'luksKey' is not \
                 defined.",
            ));
        }
    }
    failures
}

// ============================================================================
// SECTION: Time
// ============================================================================

/// Validates that forced NTP waits have a time source.
#[must_use]
pub fn validate_time(time: &Time) -> Vec<Failure> {
    let ntp = &time.ntp_configuration;
    if !ntp.force_wait || ntp.has_time_source() {
        return Vec::new();
    }
    vec![Failure::new(
        "If you're wanting to wait for NTP synchronization at boot, please ensure that you \
         provide at least one NTP time source.",
    )]
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use edge_image_definition::AdditionalRepository;
    use edge_image_definition::DiskSize;
    use edge_image_definition::NtpConfiguration;

    use super::*;

    fn messages(failures: &[Failure]) -> Vec<&str> {
        failures.iter().map(Failure::user_message).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn image_of_type(image_type: &str) -> Image {
        Image {
            image_type: image_type.to_string(),
            ..Image::default()
        }
    }

    #[test]
    fn empty_section_is_valid() {
        let raw = image_of_type("raw");
        assert!(validate_operating_system(&OperatingSystem::default(), Some(&raw)).is_empty());
        assert!(validate_operating_system(&OperatingSystem::default(), None).is_empty());
    }

    #[test]
    fn kernel_args_require_key_and_value() {
        let failures = validate_kernel_args(&strings(&["foo=", "=bar", "baz", "a=b"]));
        assert_eq!(messages(&failures), ["Kernel arguments must be specified as 'key=value'."; 3]);
    }

    #[test]
    fn kernel_arg_values_may_contain_equals() {
        assert!(validate_kernel_args(&strings(&["root=UUID=abcd"])).is_empty());
    }

    #[test]
    fn duplicate_kernel_keys_reported_once_each() {
        let failures = validate_kernel_args(&strings(&["foo=bar", "foo=wombat", "foo=x"]));
        assert_eq!(messages(&failures), ["Duplicate kernel argument found: foo"]);
    }

    #[test]
    fn fips_kernel_arg_is_redirected() {
        let failures = validate_kernel_args(&strings(&["fips=1"]));
        assert_eq!(
            messages(&failures),
            [
                "FIPS mode has been specified via kernel arguments, please use the 'enableFIPS: \
                 true' option instead."
            ]
        );
    }

    #[test]
    fn systemd_duplicates_and_conflicts() {
        let systemd = Systemd {
            enable: strings(&["foo", "foo", "bar", "baz", "baz"]),
            disable: strings(&["bar", "bar", "qux"]),
        };
        assert_eq!(
            messages(&validate_systemd(&systemd)),
            [
                "Systemd enable list contains duplicate entries: foo, baz",
                "Systemd disable list contains duplicate entries: bar",
                "Systemd conflict found, 'bar' is both enabled and disabled.",
            ]
        );
    }

    #[test]
    fn groups_need_unique_names() {
        let groups = vec![
            OperatingSystemGroup {
                name: "ops".to_string(),
                gid: None,
            },
            OperatingSystemGroup::default(),
            OperatingSystemGroup {
                name: "ops".to_string(),
                gid: Some(10),
            },
        ];
        assert_eq!(
            messages(&validate_groups(&groups)),
            [
                "The 'name' field is required for all entries under 'groups'.",
                "Duplicate group name found: ops",
            ]
        );
    }

    #[test]
    fn users_need_credentials_and_home_for_keys() {
        let users = vec![
            OperatingSystemUser {
                username: "danny".to_string(),
                ..OperatingSystemUser::default()
            },
            OperatingSystemUser {
                username: "edu".to_string(),
                ssh_keys: strings(&["key1"]),
                ..OperatingSystemUser::default()
            },
            OperatingSystemUser {
                username: "edu".to_string(),
                encrypted_password: "hash".to_string(),
                ..OperatingSystemUser::default()
            },
        ];
        assert_eq!(
            messages(&validate_users(&users)),
            [
                "User 'danny' must have either a password or at least one SSH key.",
                "Duplicate username found: edu",
                "The 'createHomeDir' attribute must be set to 'true' if at least one SSH key is \
                 specified.",
            ]
        );
    }

    #[test]
    fn suma_rules() {
        assert!(validate_suma(&Suma::default()).is_empty());
        let suma = Suma {
            host: "https://suma.example.com".to_string(),
            activation_key: String::new(),
        };
        assert_eq!(
            messages(&validate_suma(&suma)),
            [
                "The suma 'host' field may not contain 'http://' or 'https://'",
                "The 'activationKey' field is required for the 'suma' section.",
            ]
        );
    }

    #[test]
    fn package_rules() {
        let packages = Packages {
            package_list: strings(&["foo", "", "bar", "foo", "", "bar"]),
            additional_repos: vec![
                AdditionalRepository {
                    url: "foo".to_string(),
                    unsigned: false,
                },
                AdditionalRepository::default(),
                AdditionalRepository {
                    url: "foo".to_string(),
                    unsigned: true,
                },
            ],
            ..Packages::default()
        };
        assert_eq!(
            messages(&validate_packages(&packages)),
            [
                "The 'packageList' field cannot contain empty values.",
                "The 'packageList' field contains duplicate packages: foo, bar",
                "The 'url' field is required for all entries under 'additionalRepos'.",
                "The 'additionalRepos' field contains duplicate repos: foo",
            ]
        );
    }

    #[test]
    fn fips_requires_a_package_source() {
        let mut os = OperatingSystem {
            enable_fips: true,
            ..OperatingSystem::default()
        };
        assert_eq!(validate_fips(&os).len(), 1);
        os.packages.registration_code = "scc".to_string();
        assert!(validate_fips(&os).is_empty());
    }

    #[test]
    fn install_device_requires_iso() {
        let mut os = OperatingSystem::default();
        os.iso_configuration.install_device = "/dev/sda".to_string();
        assert!(validate_iso_configuration(&os, Some(&image_of_type("iso"))).is_empty());
        assert_eq!(validate_iso_configuration(&os, Some(&image_of_type("raw"))).len(), 1);
        assert!(validate_iso_configuration(&os, None).is_empty());
    }

    #[test]
    fn encryption_options_on_iso_images() {
        let raw = RawConfiguration {
            luks_key: "1234".to_string(),
            expand_encrypted_partition: true,
            ..RawConfiguration::default()
        };
        assert_eq!(
            messages(&validate_raw_configuration(&raw, Some(&image_of_type("iso")))),
            [
                "The 'luksKey' field should only be defined for 'raw' encrypted images.",
                "The 'expandEncryptedPartition' field can only be defined for 'raw' encrypted \
                 images.",
            ]
        );
        assert!(validate_raw_configuration(&raw, Some(&image_of_type("raw"))).is_empty());
    }

    #[test]
    fn expand_partition_requires_luks_key() {
        let raw = RawConfiguration {
            disk_size: DiskSize("130B".to_string()),
            expand_encrypted_partition: true,
            ..RawConfiguration::default()
        };
        assert_eq!(
            messages(&validate_raw_configuration(&raw, Some(&image_of_type("raw")))),
            [
                "The 'diskSize' field must be an integer followed by a suffix of either 'M', 'G', \
                 or 'T'.",
                "The 'expandEncryptedPartition' field cannot be 'true' when 'luksKey' is not \
                 defined.",
            ]
        );
    }

    #[test]
    fn forced_ntp_wait_needs_a_source() {
        let mut time = Time {
            ntp_configuration: NtpConfiguration {
                force_wait: true,
                ..NtpConfiguration::default()
            },
            ..Time::default()
        };
        assert_eq!(validate_time(&time).len(), 1);
        time.ntp_configuration.servers = strings(&["10.0.0.1"]);
        assert!(validate_time(&time).is_empty());
    }
}
