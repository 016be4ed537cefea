//! Builder: arma un `Computer` pieza por pieza con una API encadenada.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computer {
    pub cpu: String,
    pub memory: String,
    pub storage: String,
    pub graphics: String,
}

/// Partes sin configurar quedan en `"none"`
#[derive(Debug, Default)]
pub struct ComputerBuilder {
    cpu: Option<String>,
    memory: Option<String>,
    storage: Option<String>,
    graphics: Option<String>,
}

impl ComputerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset de gaming; cada parte se puede seguir cambiando.
    pub fn gaming() -> Self {
        Self::new()
            .cpu("Intel i9-13900K")
            .memory("32GB DDR5")
            .storage("2TB NVMe SSD")
            .graphics("RTX 4090")
    }

    pub fn cpu(mut self, cpu: impl Into<String>) -> Self {
        self.cpu = Some(cpu.into());
        self
    }

    pub fn memory(mut self, memory: impl Into<String>) -> Self {
        self.memory = Some(memory.into());
        self
    }

    pub fn storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    pub fn graphics(mut self, graphics: impl Into<String>) -> Self {
        self.graphics = Some(graphics.into());
        self
    }

    pub fn build(self) -> Computer {
        let part = |p: Option<String>| p.unwrap_or_else(|| "none".to_string());
        Computer {
            cpu: part(self.cpu),
            memory: part(self.memory),
            storage: part(self.storage),
            graphics: part(self.graphics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_every_part() {
        let computer = ComputerBuilder::new()
            .cpu("Ryzen 7")
            .memory("16GB")
            .storage("1TB")
            .graphics("RX 7800")
            .build();

        assert_eq!(computer.cpu, "Ryzen 7");
        assert_eq!(computer.graphics, "RX 7800");
    }

    #[test]
    fn test_unset_parts_and_overrides() {
        let office = ComputerBuilder::new().cpu("i5").build();
        assert_eq!(office.memory, "none");

        let gaming = ComputerBuilder::gaming().memory("64GB DDR5").build();
        assert_eq!(gaming.memory, "64GB DDR5");
        assert_eq!(gaming.graphics, "RTX 4090");
    }
}
