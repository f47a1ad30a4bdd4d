//! Canonical formula set
//!
//! One expression tree per estimator and per composition step. The
//! calculator evaluates these trees and the exporter renders the same trees,
//! so the two can never disagree.

use std::fmt;
use std::str::FromStr;

use crate::core::config::CalculatorConfig;
use crate::core::material::normalize;
use crate::formula::expr::Expr;
use crate::formula::render::{render, render_pretty};

/// Input and intermediate names shared by the trees and the calculator
pub mod names {
    pub const DRILL_SIZE: &str = "DrillSize";
    pub const LENGTH_TO_DRILL: &str = "LengthToDrill";
    pub const RPM: &str = "RPM";
    pub const FEED_RATE: &str = "FeedRate";
    pub const MATERIAL_GRADE: &str = "MaterialGrade";
    pub const NUMBER_OF_FEATURES: &str = "NumberOfFeatures";
    pub const TOOL_WEAR_CONSIDERATION: &str = "ToolWearConsideration";
    pub const WALL_THICKNESS_INSPECTION: &str = "WallThicknessInspection";
    pub const CUSTOM_SETUP_TIME: &str = "CustomSetupTime";
    pub const CUSTOM_GRINDING_TIME: &str = "CustomGrindingTime";
    pub const GRINDING_FREQUENCY: &str = "GrindingFrequency";

    pub const CUTTING_TIME: &str = "CuttingTime";
    pub const SETUP_TIME: &str = "SetupTime";
    pub const GRINDING_TIME: &str = "GrindingTime";
    pub const INSPECTION_TIME: &str = "InspectionTime";
    pub const PER_FEATURE_TIME: &str = "PerFeatureTime";
    pub const TOTAL_CUTTING_TIME: &str = "TotalCuttingTime";
    pub const TOTAL_GRINDING_TIME: &str = "TotalGrindingTime";
    pub const TOOL_WEAR_ADDITIONAL_TIME: &str = "ToolWearAdditionalTime";
    pub const TOTAL_STANDARD_TIME: &str = "TotalStandardTime";
}

/// Identifies one formula in the set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormulaId {
    CuttingTime,
    SetupTime,
    GrindingTime,
    InspectionTime,
    PerFeatureTime,
    TotalCuttingTime,
    TotalGrindingTime,
    ToolWearAdditionalTime,
    TotalStandardTime,
}

impl FormulaId {
    /// All formulas in evaluation order
    pub const ALL: [FormulaId; 9] = [
        FormulaId::CuttingTime,
        FormulaId::SetupTime,
        FormulaId::GrindingTime,
        FormulaId::InspectionTime,
        FormulaId::PerFeatureTime,
        FormulaId::TotalCuttingTime,
        FormulaId::TotalGrindingTime,
        FormulaId::ToolWearAdditionalTime,
        FormulaId::TotalStandardTime,
    ];

    /// Name of the value this formula produces
    pub fn output_name(self) -> &'static str {
        match self {
            FormulaId::CuttingTime => names::CUTTING_TIME,
            FormulaId::SetupTime => names::SETUP_TIME,
            FormulaId::GrindingTime => names::GRINDING_TIME,
            FormulaId::InspectionTime => names::INSPECTION_TIME,
            FormulaId::PerFeatureTime => names::PER_FEATURE_TIME,
            FormulaId::TotalCuttingTime => names::TOTAL_CUTTING_TIME,
            FormulaId::TotalGrindingTime => names::TOTAL_GRINDING_TIME,
            FormulaId::ToolWearAdditionalTime => names::TOOL_WEAR_ADDITIONAL_TIME,
            FormulaId::TotalStandardTime => names::TOTAL_STANDARD_TIME,
        }
    }

    /// Kebab-case identifier used on the command line
    pub fn slug(self) -> &'static str {
        match self {
            FormulaId::CuttingTime => "cutting-time",
            FormulaId::SetupTime => "setup-time",
            FormulaId::GrindingTime => "grinding-time",
            FormulaId::InspectionTime => "inspection-time",
            FormulaId::PerFeatureTime => "per-feature-time",
            FormulaId::TotalCuttingTime => "total-cutting-time",
            FormulaId::TotalGrindingTime => "total-grinding-time",
            FormulaId::ToolWearAdditionalTime => "tool-wear-additional-time",
            FormulaId::TotalStandardTime => "total-standard-time",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FormulaId::CuttingTime => "Cutting time per feature (minutes)",
            FormulaId::SetupTime => "Setup time, once per job (minutes)",
            FormulaId::GrindingTime => "Grinding time per feature (minutes)",
            FormulaId::InspectionTime => "Inspection time across all features (minutes)",
            FormulaId::PerFeatureTime => "Per-feature time including tool wear (minutes)",
            FormulaId::TotalCuttingTime => "Per-feature time across all features (minutes)",
            FormulaId::TotalGrindingTime => "Grinding time across all features (minutes)",
            FormulaId::ToolWearAdditionalTime => "Time added by the tool-wear surcharge (minutes)",
            FormulaId::TotalStandardTime => "Total standard time for the job (minutes)",
        }
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for FormulaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        FormulaId::ALL
            .iter()
            .copied()
            .find(|id| id.slug() == wanted || id.output_name().to_lowercase() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = FormulaId::ALL.iter().map(|id| id.slug()).collect();
                format!("unknown formula '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// A named expression tree
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub id: FormulaId,
    pub expr: Expr,
}

impl Formula {
    /// Inputs the formula reads
    pub fn inputs(&self) -> Vec<String> {
        self.expr.free_names()
    }

    /// Rule-expression text on one line
    pub fn to_text(&self) -> String {
        render(&self.expr)
    }

    /// Rule-expression text, indented
    pub fn to_pretty_text(&self) -> String {
        render_pretty(&self.expr)
    }
}

/// Every formula the calculator evaluates, built from one config
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaSet {
    cutting_time: Formula,
    setup_time: Formula,
    grinding_time: Formula,
    inspection_time: Formula,
    per_feature_time: Formula,
    total_cutting_time: Formula,
    total_grinding_time: Formula,
    tool_wear_additional_time: Formula,
    total_standard_time: Formula,
}

impl FormulaSet {
    pub fn from_config(config: &CalculatorConfig) -> Self {
        let formula = |id, expr| Formula { id, expr };
        Self {
            cutting_time: formula(FormulaId::CuttingTime, cutting_time(config)),
            setup_time: formula(FormulaId::SetupTime, setup_time(config)),
            grinding_time: formula(FormulaId::GrindingTime, grinding_time(config)),
            inspection_time: formula(FormulaId::InspectionTime, inspection_time(config)),
            per_feature_time: formula(FormulaId::PerFeatureTime, per_feature_time(config)),
            total_cutting_time: formula(FormulaId::TotalCuttingTime, total_cutting_time()),
            total_grinding_time: formula(FormulaId::TotalGrindingTime, total_grinding_time()),
            tool_wear_additional_time: formula(
                FormulaId::ToolWearAdditionalTime,
                tool_wear_additional_time(config),
            ),
            total_standard_time: formula(FormulaId::TotalStandardTime, total_standard_time()),
        }
    }

    pub fn get(&self, id: FormulaId) -> &Formula {
        match id {
            FormulaId::CuttingTime => &self.cutting_time,
            FormulaId::SetupTime => &self.setup_time,
            FormulaId::GrindingTime => &self.grinding_time,
            FormulaId::InspectionTime => &self.inspection_time,
            FormulaId::PerFeatureTime => &self.per_feature_time,
            FormulaId::TotalCuttingTime => &self.total_cutting_time,
            FormulaId::TotalGrindingTime => &self.total_grinding_time,
            FormulaId::ToolWearAdditionalTime => &self.tool_wear_additional_time,
            FormulaId::TotalStandardTime => &self.total_standard_time,
        }
    }

    /// Formulas in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &Formula> {
        FormulaId::ALL.iter().map(move |id| self.get(*id))
    }
}

impl Default for FormulaSet {
    fn default() -> Self {
        Self::from_config(&CalculatorConfig::default())
    }
}

fn n(value: f64) -> Expr {
    Expr::num(value)
}

fn name(name: &str) -> Expr {
    Expr::name(name)
}

/// `1 + (LengthToDrill / 1000) * rate`: a `rate` fraction per metre of depth
fn length_factor(rate: f64) -> Expr {
    n(1.0) + name(names::LENGTH_TO_DRILL) / n(1000.0) * n(rate)
}

fn cutting_time(config: &CalculatorConfig) -> Expr {
    let drill = || name(names::DRILL_SIZE);
    let ratio = || name("RPMRatio");

    let material_factor = Expr::switch(
        name(names::MATERIAL_GRADE).lower(),
        config
            .material_factors
            .entries()
            .map(|(grade, factor)| (grade.to_string(), n(factor)))
            .collect(),
        n(1.0),
    );

    // Small drills are penalized as well as large ones
    let size_factor = Expr::if_then(
        drill().le(n(5.0)),
        n(1.1),
        Expr::if_then(
            drill().le(n(10.0)),
            n(1.0),
            Expr::if_then(drill().le(n(20.0)), n(1.05), n(1.15)),
        ),
    );

    let optimal_rpm = n(config.optimal_surface_speed) * n(1000.0) / (Expr::Pi * drill());

    let rpm_factor = Expr::if_then(
        Expr::And(vec![ratio().ge(n(0.8)), ratio().le(n(1.2))]),
        n(1.0),
        Expr::if_then(
            Expr::Or(vec![
                Expr::And(vec![ratio().ge(n(0.6)), ratio().lt(n(0.8))]),
                Expr::And(vec![ratio().gt(n(1.2)), ratio().le(n(1.5))]),
            ]),
            n(1.1),
            n(1.25),
        ),
    );

    let result = (name("BasicCuttingTime")
        * name("MaterialFactor")
        * name("SizeFactor")
        * name("RPMFactor"))
    .round(2);

    Expr::with(
        vec![
            (
                "BasicCuttingTime",
                name(names::LENGTH_TO_DRILL) / name(names::FEED_RATE),
            ),
            ("MaterialFactor", material_factor),
            ("SizeFactor", size_factor),
            ("OptimalRPM", optimal_rpm),
        ],
        Expr::with(
            vec![("RPMRatio", name(names::RPM) / name("OptimalRPM"))],
            Expr::with(vec![("RPMFactor", rpm_factor)], result),
        ),
    )
}

fn setup_time(config: &CalculatorConfig) -> Expr {
    let drill = || name(names::DRILL_SIZE);

    let hard_material = Expr::Or(
        config
            .hard_setup_materials
            .iter()
            .map(|m| name(names::MATERIAL_GRADE).lower().eq_to(Expr::text(normalize(m))))
            .collect(),
    );

    let computed = Expr::with(
        vec![
            ("BaseSetupTime", n(config.default_setup_time)),
            (
                "SizeFactor",
                Expr::if_then(
                    drill().gt(n(20.0)),
                    n(1.5),
                    Expr::if_then(drill().gt(n(10.0)), n(1.2), n(1.0)),
                ),
            ),
            ("MaterialFactor", Expr::if_then(hard_material, n(1.3), n(1.0))),
            ("LengthFactor", length_factor(0.1)),
        ],
        (name("BaseSetupTime") * name("SizeFactor") * name("MaterialFactor") * name("LengthFactor"))
            .round(2),
    );

    Expr::if_then(
        name(names::CUSTOM_SETUP_TIME).is_blank(),
        computed,
        name(names::CUSTOM_SETUP_TIME),
    )
}

fn grinding_time(config: &CalculatorConfig) -> Expr {
    let drill = || name(names::DRILL_SIZE);

    let computed = Expr::with(
        vec![
            ("BaseGrindingTime", n(config.default_grinding_time)),
            (
                "SizeFactor",
                Expr::if_then(
                    drill().gt(n(15.0)),
                    n(1.4),
                    Expr::if_then(drill().gt(n(8.0)), n(1.2), n(1.0)),
                ),
            ),
            ("LengthFactor", length_factor(0.05)),
        ],
        (name("BaseGrindingTime") * name("SizeFactor") * name("LengthFactor")
            / name(names::GRINDING_FREQUENCY))
        .round(2),
    );

    Expr::if_then(
        name(names::CUSTOM_GRINDING_TIME).is_blank(),
        computed,
        name(names::CUSTOM_GRINDING_TIME),
    )
}

fn inspection_time(config: &CalculatorConfig) -> Expr {
    let base = n(config.default_inspection_time);
    Expr::with(
        vec![
            (
                "BaseInspectionTime",
                Expr::if_then(
                    name(names::WALL_THICKNESS_INSPECTION),
                    base.clone() * n(1.8),
                    base,
                ),
            ),
            ("LengthFactor", length_factor(0.08)),
        ],
        (name("BaseInspectionTime") * name(names::NUMBER_OF_FEATURES) * name("LengthFactor"))
            .round(2),
    )
}

// Inspection is an aggregate: it is divided back to a per-feature share here
// and multiplied out again by the total formulas.
fn per_feature_time(config: &CalculatorConfig) -> Expr {
    let base = || name("BasePerFeatureTime");
    Expr::with(
        vec![(
            "BasePerFeatureTime",
            name(names::CUTTING_TIME)
                + name(names::GRINDING_TIME)
                + name(names::INSPECTION_TIME) / name(names::NUMBER_OF_FEATURES),
        )],
        Expr::if_then(
            name(names::TOOL_WEAR_CONSIDERATION),
            base() * (n(1.0) + n(config.tool_wear_factor)),
            base(),
        ),
    )
}

fn total_cutting_time() -> Expr {
    (name(names::PER_FEATURE_TIME) * name(names::NUMBER_OF_FEATURES)).round(2)
}

fn total_grinding_time() -> Expr {
    (name(names::GRINDING_TIME) * name(names::NUMBER_OF_FEATURES)).round(2)
}

fn tool_wear_additional_time(config: &CalculatorConfig) -> Expr {
    Expr::if_then(
        name(names::TOOL_WEAR_CONSIDERATION),
        (name(names::PER_FEATURE_TIME) * n(config.tool_wear_factor) * name(names::NUMBER_OF_FEATURES))
            .round(2),
        n(0.0),
    )
}

fn total_standard_time() -> Expr {
    (name(names::PER_FEATURE_TIME) * name(names::NUMBER_OF_FEATURES)
        + name(names::SETUP_TIME)
        + name(names::INSPECTION_TIME))
    .round(2)
}
