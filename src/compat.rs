//! Cross-component compatibility validation
//!
//! Structural checks over a build configuration: socket and memory-type
//! agreement, GPU clearance, cooler capacity, PSU sizing, and case /
//! motherboard form factors. Each check is independent and silently
//! skipped when the components it needs are absent — a partial build is
//! a normal input, not an error.
//!
//! Severity is tiered: `Critical` is reserved for binary
//! incompatibilities (wrong socket, wrong memory generation, a GPU that
//! physically cannot fit). Headroom and margin concerns are `Warning`
//! and never flip the overall verdict.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Assumed GPU length when the spec does not declare one, in mm.
/// Sized to a typical triple-fan board.
pub const DEFAULT_GPU_LENGTH_MM: f64 = 285.0;
/// Baseline draw of board, fans, storage and peripherals, in watts.
pub const BASE_SYSTEM_DRAW_W: f64 = 100.0;
/// Required PSU headroom over computed draw.
pub const PSU_HEADROOM_FACTOR: f64 = 1.2;
/// Cooler capacity under this margin over CPU TDP draws a warning.
pub const COOLING_HEADROOM_FACTOR: f64 = 1.2;
/// Share of a GPU's recommended PSU figure attributed to the GPU itself.
pub const GPU_SHARE_OF_RECOMMENDED_PSU: f64 = 0.8;

/// Build slot a component occupies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Cpu,
    Gpu,
    Motherboard,
    Ram,
    Storage,
    Psu,
    Case,
    Cooler,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
            Self::Motherboard => "motherboard",
            Self::Ram => "ram",
            Self::Storage => "storage",
            Self::Psu => "psu",
            Self::Case => "case",
            Self::Cooler => "cooler",
        };
        write!(f, "{s}")
    }
}

/// A named component with the attributes relevant to its slot.
/// Supplied per request by the caller; read-only inside the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub socket: Option<String>,
    #[serde(default)]
    pub memory_type: Option<String>,
    #[serde(default)]
    pub tdp_w: Option<f64>,
    #[serde(default)]
    pub wattage_w: Option<f64>,
    #[serde(default)]
    pub max_tdp_w: Option<f64>,
    #[serde(default)]
    pub length_mm: Option<f64>,
    #[serde(default)]
    pub max_gpu_length_mm: Option<f64>,
    #[serde(default)]
    pub form_factor: Option<String>,
    #[serde(default)]
    pub module_count: Option<u32>,
    #[serde(default)]
    pub memory_slots: Option<u32>,
    #[serde(default)]
    pub recommended_psu_w: Option<f64>,
    #[serde(default)]
    pub supported_sockets: Option<Vec<String>>,
    #[serde(default)]
    pub memory_gb: Option<f64>,
}

impl ComponentSpec {
    /// Minimal spec carrying just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fail fast on malformed attributes so bad upstream data surfaces
    /// at the point of use instead of skewing the analysis.
    pub fn validate(&self, slot: Slot) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidSpec(format!("{slot}: name is empty")));
        }
        let numeric = [
            ("tdp_w", self.tdp_w),
            ("wattage_w", self.wattage_w),
            ("max_tdp_w", self.max_tdp_w),
            ("length_mm", self.length_mm),
            ("max_gpu_length_mm", self.max_gpu_length_mm),
            ("recommended_psu_w", self.recommended_psu_w),
            ("memory_gb", self.memory_gb),
        ];
        for (field, value) in numeric {
            if let Some(v) = value {
                if v < 0.0 || !v.is_finite() {
                    return Err(Error::InvalidSpec(format!(
                        "{slot}: {field} = {v} is negative or non-finite"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Full or partial build: slot → component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(flatten)]
    components: BTreeMap<Slot, ComponentSpec>,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: Slot, spec: ComponentSpec) -> &mut Self {
        self.components.insert(slot, spec);
        self
    }

    pub fn get(&self, slot: Slot) -> Option<&ComponentSpec> {
        self.components.get(&slot)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = (Slot, &ComponentSpec)> {
        self.components.iter().map(|(s, c)| (*s, c))
    }

    /// Validate every component spec.
    pub fn validate(&self) -> Result<()> {
        for (slot, spec) in self.slots() {
            spec.validate(slot)?;
        }
        Ok(())
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("cannot read {path}: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Generate a sample build config
    pub fn sample_toml() -> String {
        r#"# rig-insight build configuration

[cpu]
name = "AMD Ryzen 7 7800X3D"
socket = "AM5"
tdp_w = 120.0

[gpu]
name = "GeForce RTX 4070 Super"
manufacturer = "NVIDIA"
tdp_w = 220.0
recommended_psu_w = 650.0
length_mm = 267.0

[motherboard]
name = "B650 Tomahawk"
socket = "AM5"
memory_type = "DDR5"
memory_slots = 4
form_factor = "ATX"

[ram]
name = "32GB DDR5-6000"
memory_type = "DDR5"
module_count = 2
memory_gb = 32.0

[psu]
name = "1000W Gold"
wattage_w = 1000.0

[case]
name = "Mid Tower"
form_factor = "ATX"
max_gpu_length_mm = 360.0

[cooler]
name = "240mm AIO"
max_tdp_w = 250.0
supported_sockets = ["AM5", "AM4", "LGA1700"]
"#
        .into()
    }
}

/// Category of a compatibility finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SocketMismatch,
    MemoryMismatch,
    MemorySlots,
    CaseClearance,
    CoolingInsufficient,
    CoolingHeadroom,
    CoolerSocket,
    PsuInsufficient,
    FormFactor,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SocketMismatch => "socket_mismatch",
            Self::MemoryMismatch => "memory_mismatch",
            Self::MemorySlots => "memory_slots",
            Self::CaseClearance => "case_clearance",
            Self::CoolingInsufficient => "cooling_insufficient",
            Self::CoolingHeadroom => "cooling_headroom",
            Self::CoolerSocket => "cooler_socket",
            Self::PsuInsufficient => "psu_insufficient",
            Self::FormFactor => "form_factor",
        };
        write!(f, "{s}")
    }
}

/// Finding severity. `Critical` findings make the build incompatible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// One compatibility finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub affected: Vec<Slot>,
}

/// Outcome of a compatibility check. `compatible` is false exactly when
/// `issues` (the critical tier) is non-empty; `warnings` never affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub compatible: bool,
    pub issues: Vec<CompatibilityIssue>,
    pub warnings: Vec<CompatibilityIssue>,
}

// Which board form factors each case form factor accepts. Normalized
// lowercase without separators. Non-standard cases fall outside the
// table and are judged leniently (warning only).
fn accepted_boards(case_ff: &str) -> Option<&'static [&'static str]> {
    match case_ff {
        "eatx" => Some(&["eatx", "atx", "microatx", "miniitx"]),
        "atx" => Some(&["atx", "microatx", "miniitx"]),
        "microatx" => Some(&["microatx", "miniitx"]),
        "miniitx" => Some(&["miniitx"]),
        _ => None,
    }
}

fn normalize_form_factor(ff: &str) -> String {
    let compact: String = ff
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match compact.as_str() {
        "matx" | "uatx" => "microatx".into(),
        "itx" => "miniitx".into(),
        other => other.into(),
    }
}

/// Stateless validator over a [`BuildConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityChecker;

impl CompatibilityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Run every applicable check. Components a check needs that are
    /// absent from the build cause the check to be skipped silently.
    pub fn check(&self, config: &BuildConfig) -> Result<CompatibilityReport> {
        config.validate()?;

        let mut findings = Vec::new();
        self.check_socket(config, &mut findings);
        self.check_memory(config, &mut findings);
        self.check_gpu_clearance(config, &mut findings);
        self.check_cooling(config, &mut findings);
        self.check_psu(config, &mut findings);
        self.check_form_factor(config, &mut findings);

        let (issues, warnings): (Vec<_>, Vec<_>) = findings
            .into_iter()
            .partition(|f| f.severity == Severity::Critical);
        let compatible = issues.is_empty();
        log::debug!(
            "compatibility check: {} critical, {} warnings",
            issues.len(),
            warnings.len()
        );
        Ok(CompatibilityReport {
            compatible,
            issues,
            warnings,
        })
    }

    fn check_socket(&self, config: &BuildConfig, out: &mut Vec<CompatibilityIssue>) {
        let (Some(cpu), Some(board)) = (config.get(Slot::Cpu), config.get(Slot::Motherboard))
        else {
            return;
        };
        let (Some(cpu_socket), Some(board_socket)) = (&cpu.socket, &board.socket) else {
            return;
        };
        if !cpu_socket.eq_ignore_ascii_case(board_socket) {
            out.push(CompatibilityIssue {
                kind: IssueKind::SocketMismatch,
                severity: Severity::Critical,
                message: format!(
                    "CPU socket {cpu_socket} does not fit motherboard socket {board_socket}"
                ),
                affected: vec![Slot::Cpu, Slot::Motherboard],
            });
        }
    }

    fn check_memory(&self, config: &BuildConfig, out: &mut Vec<CompatibilityIssue>) {
        let (Some(ram), Some(board)) = (config.get(Slot::Ram), config.get(Slot::Motherboard))
        else {
            return;
        };
        if let (Some(ram_type), Some(board_type)) = (&ram.memory_type, &board.memory_type) {
            if !ram_type.eq_ignore_ascii_case(board_type) {
                out.push(CompatibilityIssue {
                    kind: IssueKind::MemoryMismatch,
                    severity: Severity::Critical,
                    message: format!(
                        "{ram_type} memory is incompatible with a {board_type} motherboard"
                    ),
                    affected: vec![Slot::Ram, Slot::Motherboard],
                });
            }
        }
        if let (Some(modules), Some(slots)) = (ram.module_count, board.memory_slots) {
            if modules > slots {
                out.push(CompatibilityIssue {
                    kind: IssueKind::MemorySlots,
                    severity: Severity::Critical,
                    message: format!(
                        "{modules} memory modules exceed the board's {slots} slots"
                    ),
                    affected: vec![Slot::Ram, Slot::Motherboard],
                });
            }
        }
    }

    fn check_gpu_clearance(&self, config: &BuildConfig, out: &mut Vec<CompatibilityIssue>) {
        let (Some(gpu), Some(case)) = (config.get(Slot::Gpu), config.get(Slot::Case)) else {
            return;
        };
        let gpu_length = gpu.length_mm.unwrap_or(DEFAULT_GPU_LENGTH_MM);
        match case.max_gpu_length_mm {
            Some(max) if gpu_length > max => out.push(CompatibilityIssue {
                kind: IssueKind::CaseClearance,
                severity: Severity::Critical,
                message: format!(
                    "GPU length {gpu_length:.0} mm exceeds the case limit of {max:.0} mm"
                ),
                affected: vec![Slot::Gpu, Slot::Case],
            }),
            Some(_) => {}
            None => out.push(CompatibilityIssue {
                kind: IssueKind::CaseClearance,
                severity: Severity::Warning,
                message: format!(
                    "case does not declare a GPU length limit; verify {gpu_length:.0} mm of clearance"
                ),
                affected: vec![Slot::Gpu, Slot::Case],
            }),
        }
    }

    fn check_cooling(&self, config: &BuildConfig, out: &mut Vec<CompatibilityIssue>) {
        let (Some(cooler), Some(cpu)) = (config.get(Slot::Cooler), config.get(Slot::Cpu))
        else {
            return;
        };
        if let (Some(supported), Some(cpu_socket)) = (&cooler.supported_sockets, &cpu.socket) {
            if !supported.iter().any(|s| s.eq_ignore_ascii_case(cpu_socket)) {
                out.push(CompatibilityIssue {
                    kind: IssueKind::CoolerSocket,
                    severity: Severity::Critical,
                    message: format!(
                        "cooler mounting kit does not support socket {cpu_socket}"
                    ),
                    affected: vec![Slot::Cooler, Slot::Cpu],
                });
            }
        }
        let (Some(max_tdp), Some(cpu_tdp)) = (cooler.max_tdp_w, cpu.tdp_w) else {
            return;
        };
        if max_tdp < cpu_tdp {
            out.push(CompatibilityIssue {
                kind: IssueKind::CoolingInsufficient,
                severity: Severity::Warning,
                message: format!(
                    "cooler rated for {max_tdp:.0} W is below the CPU's {cpu_tdp:.0} W TDP"
                ),
                affected: vec![Slot::Cooler, Slot::Cpu],
            });
        } else if max_tdp < cpu_tdp * COOLING_HEADROOM_FACTOR {
            out.push(CompatibilityIssue {
                kind: IssueKind::CoolingHeadroom,
                severity: Severity::Warning,
                message: format!(
                    "cooler headroom under 20% ({max_tdp:.0} W rating vs {cpu_tdp:.0} W TDP); expect noise under sustained load"
                ),
                affected: vec![Slot::Cooler, Slot::Cpu],
            });
        }
    }

    fn check_psu(&self, config: &BuildConfig, out: &mut Vec<CompatibilityIssue>) {
        let (Some(psu), Some(cpu), Some(gpu)) = (
            config.get(Slot::Psu),
            config.get(Slot::Cpu),
            config.get(Slot::Gpu),
        ) else {
            return;
        };
        let (Some(wattage), Some(cpu_tdp)) = (psu.wattage_w, cpu.tdp_w) else {
            return;
        };
        let gpu_draw = match (gpu.recommended_psu_w, gpu.tdp_w) {
            (Some(rec), Some(tdp)) => (rec * GPU_SHARE_OF_RECOMMENDED_PSU).max(tdp),
            (Some(rec), None) => rec * GPU_SHARE_OF_RECOMMENDED_PSU,
            (None, Some(tdp)) => tdp,
            (None, None) => return,
        };
        let required = BASE_SYSTEM_DRAW_W + cpu_tdp + gpu_draw;
        if wattage < required * PSU_HEADROOM_FACTOR {
            out.push(CompatibilityIssue {
                kind: IssueKind::PsuInsufficient,
                severity: Severity::Warning,
                message: format!(
                    "{wattage:.0} W PSU is tight for an estimated {required:.0} W draw; {:.0} W recommended",
                    required * PSU_HEADROOM_FACTOR
                ),
                affected: vec![Slot::Psu, Slot::Cpu, Slot::Gpu],
            });
        }
    }

    fn check_form_factor(&self, config: &BuildConfig, out: &mut Vec<CompatibilityIssue>) {
        let (Some(case), Some(board)) = (config.get(Slot::Case), config.get(Slot::Motherboard))
        else {
            return;
        };
        let (Some(case_ff), Some(board_ff)) = (&case.form_factor, &board.form_factor) else {
            return;
        };
        let case_norm = normalize_form_factor(case_ff);
        let board_norm = normalize_form_factor(board_ff);
        let Some(accepted) = accepted_boards(&case_norm) else {
            // Unknown case form factor: nothing to judge against.
            return;
        };
        if !accepted.contains(&board_norm.as_str()) {
            out.push(CompatibilityIssue {
                kind: IssueKind::FormFactor,
                severity: Severity::Warning,
                message: format!(
                    "{board_ff} board is not listed for a {case_ff} case; some cases fit it anyway, check the case manual"
                ),
                affected: vec![Slot::Case, Slot::Motherboard],
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> CompatibilityChecker {
        CompatibilityChecker::new()
    }

    fn cpu_am5() -> ComponentSpec {
        ComponentSpec {
            socket: Some("AM5".into()),
            tdp_w: Some(120.0),
            ..ComponentSpec::named("AMD Ryzen 7 7800X3D")
        }
    }

    fn board_lga1700() -> ComponentSpec {
        ComponentSpec {
            socket: Some("LGA1700".into()),
            memory_type: Some("DDR5".into()),
            memory_slots: Some(4),
            form_factor: Some("ATX".into()),
            ..ComponentSpec::named("Z790 Gaming")
        }
    }

    #[test]
    fn test_socket_mismatch_is_single_critical() {
        let mut config = BuildConfig::new();
        config.set(Slot::Cpu, cpu_am5());
        config.set(Slot::Motherboard, board_lga1700());
        let report = checker().check(&config).unwrap();
        assert!(!report.compatible);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::SocketMismatch);
        assert_eq!(report.issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_missing_motherboard_skips_checks() {
        let mut config = BuildConfig::new();
        config.set(Slot::Cpu, cpu_am5());
        config.set(
            Slot::Ram,
            ComponentSpec {
                memory_type: Some("DDR4".into()),
                module_count: Some(4),
                ..ComponentSpec::named("32GB DDR4")
            },
        );
        let report = checker().check(&config).unwrap();
        assert!(report.compatible);
        assert!(report.issues.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_memory_type_mismatch_critical() {
        let mut config = BuildConfig::new();
        config.set(Slot::Motherboard, board_lga1700());
        config.set(
            Slot::Ram,
            ComponentSpec {
                memory_type: Some("DDR4".into()),
                module_count: Some(2),
                ..ComponentSpec::named("32GB DDR4")
            },
        );
        let report = checker().check(&config).unwrap();
        assert!(!report.compatible);
        assert_eq!(report.issues[0].kind, IssueKind::MemoryMismatch);
    }

    #[test]
    fn test_too_many_modules_critical() {
        let mut config = BuildConfig::new();
        config.set(Slot::Motherboard, board_lga1700());
        config.set(
            Slot::Ram,
            ComponentSpec {
                memory_type: Some("DDR5".into()),
                module_count: Some(6),
                ..ComponentSpec::named("96GB DDR5")
            },
        );
        let report = checker().check(&config).unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::MemorySlots);
    }

    #[test]
    fn test_gpu_too_long_critical() {
        let mut config = BuildConfig::new();
        config.set(
            Slot::Gpu,
            ComponentSpec {
                length_mm: Some(336.0),
                ..ComponentSpec::named("RTX 4090 Strix")
            },
        );
        config.set(
            Slot::Case,
            ComponentSpec {
                max_gpu_length_mm: Some(320.0),
                ..ComponentSpec::named("SFF Case")
            },
        );
        let report = checker().check(&config).unwrap();
        assert!(!report.compatible);
        assert_eq!(report.issues[0].kind, IssueKind::CaseClearance);
    }

    #[test]
    fn test_unknown_case_limit_is_warning() {
        let mut config = BuildConfig::new();
        config.set(Slot::Gpu, ComponentSpec::named("RTX 4070"));
        config.set(Slot::Case, ComponentSpec::named("No-name Case"));
        let report = checker().check(&config).unwrap();
        assert!(report.compatible);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, IssueKind::CaseClearance);
    }

    #[test]
    fn test_cooler_socket_exclusion_critical() {
        let mut config = BuildConfig::new();
        config.set(Slot::Cpu, cpu_am5());
        config.set(
            Slot::Cooler,
            ComponentSpec {
                max_tdp_w: Some(200.0),
                supported_sockets: Some(vec!["LGA1700".into(), "LGA1200".into()]),
                ..ComponentSpec::named("Intel-only Tower")
            },
        );
        let report = checker().check(&config).unwrap();
        assert!(!report.compatible);
        assert_eq!(report.issues[0].kind, IssueKind::CoolerSocket);
    }

    #[test]
    fn test_cooling_capacity_and_headroom_warnings() {
        let mut config = BuildConfig::new();
        config.set(Slot::Cpu, cpu_am5()); // 120 W
        config.set(
            Slot::Cooler,
            ComponentSpec {
                max_tdp_w: Some(95.0),
                ..ComponentSpec::named("Low-profile Cooler")
            },
        );
        let report = checker().check(&config).unwrap();
        assert!(report.compatible);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, IssueKind::CoolingInsufficient);

        // 130 W rating over a 120 W CPU: enough, but under 20% headroom
        let mut config = BuildConfig::new();
        config.set(Slot::Cpu, cpu_am5());
        config.set(
            Slot::Cooler,
            ComponentSpec {
                max_tdp_w: Some(130.0),
                ..ComponentSpec::named("Compact Tower")
            },
        );
        let report = checker().check(&config).unwrap();
        assert_eq!(report.warnings[0].kind, IssueKind::CoolingHeadroom);
    }

    #[test]
    fn test_psu_sizing_warning() {
        let mut config = BuildConfig::new();
        config.set(Slot::Cpu, cpu_am5()); // 120 W
        config.set(
            Slot::Gpu,
            ComponentSpec {
                tdp_w: Some(450.0),
                recommended_psu_w: Some(850.0),
                ..ComponentSpec::named("RTX 4090")
            },
        );
        config.set(
            Slot::Psu,
            ComponentSpec {
                wattage_w: Some(650.0),
                ..ComponentSpec::named("650W Bronze")
            },
        );
        // required = 100 + 120 + max(850*0.8, 450) = 900; needs 1080
        let report = checker().check(&config).unwrap();
        assert!(report.compatible);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, IssueKind::PsuInsufficient);
    }

    #[test]
    fn test_psu_sufficient_no_warning() {
        let mut config = BuildConfig::new();
        config.set(Slot::Cpu, cpu_am5());
        config.set(
            Slot::Gpu,
            ComponentSpec {
                tdp_w: Some(220.0),
                recommended_psu_w: Some(650.0),
                ..ComponentSpec::named("RTX 4070 Super")
            },
        );
        config.set(
            Slot::Psu,
            ComponentSpec {
                wattage_w: Some(1000.0),
                ..ComponentSpec::named("1000W Platinum")
            },
        );
        // required = 100 + 120 + max(520, 220) = 740; 1000 > 888
        let report = checker().check(&config).unwrap();
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_form_factor_mismatch_is_warning_only() {
        let mut config = BuildConfig::new();
        config.set(
            Slot::Case,
            ComponentSpec {
                form_factor: Some("Mini-ITX".into()),
                ..ComponentSpec::named("SFF Case")
            },
        );
        config.set(
            Slot::Motherboard,
            ComponentSpec {
                form_factor: Some("ATX".into()),
                socket: Some("AM5".into()),
                ..ComponentSpec::named("X670E ATX")
            },
        );
        let report = checker().check(&config).unwrap();
        assert!(report.compatible, "form factor issues never block");
        assert_eq!(report.warnings[0].kind, IssueKind::FormFactor);
    }

    #[test]
    fn test_atx_case_accepts_smaller_boards() {
        for board_ff in ["ATX", "Micro-ATX", "mATX", "Mini-ITX"] {
            let mut config = BuildConfig::new();
            config.set(
                Slot::Case,
                ComponentSpec {
                    form_factor: Some("ATX".into()),
                    ..ComponentSpec::named("Mid Tower")
                },
            );
            config.set(
                Slot::Motherboard,
                ComponentSpec {
                    form_factor: Some(board_ff.into()),
                    ..ComponentSpec::named("Board")
                },
            );
            let report = checker().check(&config).unwrap();
            assert!(report.warnings.is_empty(), "{board_ff} should fit an ATX case");
        }
    }

    #[test]
    fn test_negative_tdp_fails_fast() {
        let mut config = BuildConfig::new();
        config.set(
            Slot::Cpu,
            ComponentSpec {
                tdp_w: Some(-65.0),
                ..ComponentSpec::named("Broken Spec")
            },
        );
        let err = checker().check(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(_)));
    }

    #[test]
    fn test_wrong_typed_attribute_fails_at_parse() {
        let toml = r#"
[cpu]
name = "Some CPU"
tdp_w = "a lot"
"#;
        assert!(BuildConfig::from_toml(toml).is_err());
    }

    #[test]
    fn test_sample_config_parses_clean() {
        let config = BuildConfig::from_toml(&BuildConfig::sample_toml()).unwrap();
        let report = checker().check(&config).unwrap();
        assert!(report.compatible);
        assert!(report.issues.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_empty_config_checks_clean() {
        let report = checker().check(&BuildConfig::new()).unwrap();
        assert!(report.compatible);
    }
}
