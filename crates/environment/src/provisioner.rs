//! Default resource attribute provisioning
//!
//! Fills memory and CPU limit/request attributes on machine configs when
//! unset. An absent attribute, an unparsable value, and a literal `"0"` all
//! count as unset; zero means "no value was configured", never "zero
//! resources", and the provisioner itself never writes a zero.

use atelier_config::MemoryConfig;
use atelier_types::{
    MachineConfig, CPU_LIMIT_ATTRIBUTE, CPU_REQUEST_ATTRIBUTE, MEMORY_LIMIT_ATTRIBUTE,
    MEMORY_REQUEST_ATTRIBUTE,
};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Fills default RAM/CPU limit attributes on machine configs when unset.
#[derive(Debug, Clone)]
pub struct MemoryAttributeProvisioner {
    memory: MemoryConfig,
}

impl MemoryAttributeProvisioner {
    #[must_use]
    pub fn new(memory: MemoryConfig) -> Self {
        Self { memory }
    }

    /// Apply defaults to one machine config. Idempotent: values that are
    /// already set are never touched.
    ///
    /// Returns the effective memory limit in bytes.
    pub fn provision(&self, machine: &mut MachineConfig) -> u64 {
        let limit_bytes = self.memory.default_machine_memory_mb * BYTES_PER_MB;
        let request_bytes = self.memory.default_machine_memory_request_mb * BYTES_PER_MB;

        if Self::is_unset(machine.attribute(MEMORY_LIMIT_ATTRIBUTE)) {
            machine.set_attribute(MEMORY_LIMIT_ATTRIBUTE, limit_bytes.to_string());
        }
        if Self::is_unset(machine.attribute(MEMORY_REQUEST_ATTRIBUTE)) {
            machine.set_attribute(MEMORY_REQUEST_ATTRIBUTE, request_bytes.to_string());
        }
        if let Some(cores) = self.memory.default_machine_cpu_limit_cores {
            if Self::is_unset(machine.attribute(CPU_LIMIT_ATTRIBUTE)) {
                machine.set_attribute(CPU_LIMIT_ATTRIBUTE, cores.to_string());
            }
        }
        if let Some(cores) = self.memory.default_machine_cpu_request_cores {
            if Self::is_unset(machine.attribute(CPU_REQUEST_ATTRIBUTE)) {
                machine.set_attribute(CPU_REQUEST_ATTRIBUTE, cores.to_string());
            }
        }

        machine
            .attribute(MEMORY_LIMIT_ATTRIBUTE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(limit_bytes)
    }

    fn is_unset(value: Option<&str>) -> bool {
        match value {
            None => true,
            Some(v) => match v.parse::<f64>() {
                Ok(n) => n.abs() < f64::EPSILON,
                Err(_) => true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioner() -> MemoryAttributeProvisioner {
        MemoryAttributeProvisioner::new(MemoryConfig {
            default_machine_memory_mb: 2048,
            default_machine_memory_request_mb: 1024,
            default_machine_cpu_limit_cores: Some(2.0),
            default_machine_cpu_request_cores: None,
        })
    }

    #[test]
    fn fills_unset_attributes() {
        let mut machine = MachineConfig::new();
        let limit = provisioner().provision(&mut machine);

        assert_eq!(limit, 2048 * 1024 * 1024);
        assert_eq!(
            machine.attribute(MEMORY_LIMIT_ATTRIBUTE),
            Some("2147483648")
        );
        assert_eq!(
            machine.attribute(MEMORY_REQUEST_ATTRIBUTE),
            Some("1073741824")
        );
        assert_eq!(machine.attribute(CPU_LIMIT_ATTRIBUTE), Some("2"));
        assert_eq!(machine.attribute(CPU_REQUEST_ATTRIBUTE), None);
    }

    #[test]
    fn provisioning_is_idempotent() {
        let mut machine = MachineConfig::new();
        machine.set_attribute(MEMORY_LIMIT_ATTRIBUTE, "536870912");

        let p = provisioner();
        p.provision(&mut machine);
        let first = machine.clone();
        p.provision(&mut machine);

        assert_eq!(machine, first);
        assert_eq!(machine.attribute(MEMORY_LIMIT_ATTRIBUTE), Some("536870912"));
    }

    #[test]
    fn zero_counts_as_unset() {
        let mut machine = MachineConfig::new();
        machine.set_attribute(MEMORY_LIMIT_ATTRIBUTE, "0");
        provisioner().provision(&mut machine);
        assert_eq!(
            machine.attribute(MEMORY_LIMIT_ATTRIBUTE),
            Some("2147483648")
        );
    }

    #[test]
    fn garbage_counts_as_unset() {
        let mut machine = MachineConfig::new();
        machine.set_attribute(MEMORY_LIMIT_ATTRIBUTE, "lots");
        provisioner().provision(&mut machine);
        assert_eq!(
            machine.attribute(MEMORY_LIMIT_ATTRIBUTE),
            Some("2147483648")
        );
    }
}
