//! Phase templates and per-family catalog data

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::PlanError;

/// Template family a paper's domain maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainFamily {
    #[serde(rename = "NLP")]
    Nlp,
    #[serde(rename = "Computer Vision")]
    ComputerVision,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
}

/// Ordered classification rules, first match wins
const DOMAIN_RULES: &[(&[&str], DomainFamily)] = &[
    (&["NLP", "NATURAL LANGUAGE"], DomainFamily::Nlp),
    (&["VISION", "IMAGE"], DomainFamily::ComputerVision),
];

impl DomainFamily {
    /// Classify a free-form domain string
    pub fn classify(domain: &str) -> Self {
        debug!(%domain, "DomainFamily::classify: called");
        let upper = domain.to_uppercase();
        DOMAIN_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
            .map(|(_, family)| *family)
            .unwrap_or(Self::MachineLearning)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nlp => "NLP",
            Self::ComputerVision => "Computer Vision",
            Self::MachineLearning => "Machine Learning",
        }
    }

    /// Family-specific technical stack entries, `ml_frameworks` first
    pub(crate) fn stack_entries(&self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            Self::Nlp => &[
                ("ml_frameworks", &["TensorFlow", "PyTorch", "Transformers (Hugging Face)"]),
                ("nlp_libraries", &["spaCy", "NLTK", "Gensim"]),
            ],
            Self::ComputerVision => &[
                ("ml_frameworks", &["TensorFlow", "PyTorch", "OpenCV"]),
                ("cv_libraries", &["PIL", "scikit-image", "albumentations"]),
            ],
            Self::MachineLearning => &[("ml_frameworks", &["Scikit-learn", "TensorFlow", "PyTorch"])],
        }
    }

    /// The four architecture layers
    pub(crate) fn architecture(&self) -> [(&'static str, &'static str); 4] {
        match self {
            Self::Nlp => [
                ("data_layer", "Text preprocessing and tokenization pipeline"),
                ("model_layer", "Neural language models and transformers"),
                ("application_layer", "NLP applications and APIs"),
                ("interface_layer", "Web interface and user interaction"),
            ],
            Self::ComputerVision => [
                ("data_layer", "Image preprocessing and augmentation pipeline"),
                ("model_layer", "Convolutional neural networks and vision models"),
                ("application_layer", "Computer vision applications and APIs"),
                ("interface_layer", "Image upload interface and visualization"),
            ],
            Self::MachineLearning => [
                ("data_layer", "Data preprocessing and feature engineering"),
                ("model_layer", "Machine learning models and algorithms"),
                ("application_layer", "Prediction services and APIs"),
                ("interface_layer", "Dashboard and user interface"),
            ],
        }
    }

    pub(crate) fn data_storage(&self) -> Option<&'static str> {
        match self {
            Self::Nlp => Some("Large text corpora and pre-trained models"),
            Self::ComputerVision => Some("Image datasets and pre-trained vision models"),
            Self::MachineLearning => None,
        }
    }

    pub(crate) fn extra_deliverables(&self) -> &'static [&'static str] {
        match self {
            Self::Nlp => &["Text preprocessing pipeline", "Language model implementation"],
            Self::ComputerVision => &["Image preprocessing pipeline", "Computer vision model"],
            Self::MachineLearning => &[],
        }
    }

    pub(crate) fn extra_technical_metrics(&self) -> &'static [&'static str] {
        match self {
            Self::Nlp => &[
                "BLEU score > 25 (for translation tasks)",
                "F1-score > 0.85 (for classification)",
                "ROUGE score > 0.7 (for summarization)",
            ],
            Self::ComputerVision => &[
                "Image classification accuracy > 90%",
                "Object detection mAP > 0.5",
                "Real-time processing capability",
            ],
            Self::MachineLearning => &[],
        }
    }
}

impl fmt::Display for DomainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A phase before scaling and customization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTemplate {
    pub name: String,
    /// Relative weight, not months
    pub base_duration: u32,
    pub objectives: String,
    pub core_tasks: Vec<String>,
}

impl PhaseTemplate {
    pub fn new(name: &str, base_duration: u32, objectives: &str, core_tasks: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            base_duration,
            objectives: objectives.to_string(),
            core_tasks: core_tasks.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Phase templates for every family
#[derive(Debug, Clone)]
pub struct TemplateTable {
    nlp: Vec<PhaseTemplate>,
    computer_vision: Vec<PhaseTemplate>,
    machine_learning: Vec<PhaseTemplate>,
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateTable {
    /// Build a table, rejecting empty families and zero weights
    pub fn new(
        nlp: Vec<PhaseTemplate>,
        computer_vision: Vec<PhaseTemplate>,
        machine_learning: Vec<PhaseTemplate>,
    ) -> Result<Self, PlanError> {
        debug!("TemplateTable::new: called");
        let table = Self {
            nlp,
            computer_vision,
            machine_learning,
        };
        for family in [DomainFamily::Nlp, DomainFamily::ComputerVision, DomainFamily::MachineLearning] {
            let phases = table.family(family);
            if phases.is_empty() {
                return Err(PlanError::EmptyTemplateFamily(family.label().to_string()));
            }
            if let Some(bad) = phases.iter().find(|p| p.base_duration == 0) {
                return Err(PlanError::InvalidPhaseWeight {
                    family: family.label().to_string(),
                    phase: bad.name.clone(),
                });
            }
        }
        Ok(table)
    }

    pub fn family(&self, family: DomainFamily) -> &[PhaseTemplate] {
        match family {
            DomainFamily::Nlp => &self.nlp,
            DomainFamily::ComputerVision => &self.computer_vision,
            DomainFamily::MachineLearning => &self.machine_learning,
        }
    }

    /// The built-in five-phase templates
    pub fn builtin() -> Self {
        Self {
            nlp: vec![
                PhaseTemplate::new(
                    "Foundation and Setup",
                    3,
                    "Establish theoretical understanding and development environment",
                    &[
                        "Set up development environment",
                        "Literature review",
                        "Dataset preparation",
                        "Basic NLP understanding",
                    ],
                ),
                PhaseTemplate::new(
                    "Core Component Development",
                    6,
                    "Build fundamental NLP processing capabilities",
                    &[
                        "Text preprocessing pipeline",
                        "Basic NLP models",
                        "Feature extraction",
                        "Initial testing",
                    ],
                ),
                PhaseTemplate::new(
                    "Advanced Implementation",
                    4,
                    "Implement state-of-the-art approaches",
                    &[
                        "Neural network implementation",
                        "Advanced model training",
                        "Optimization",
                        "Performance tuning",
                    ],
                ),
                PhaseTemplate::new(
                    "Application Development",
                    4,
                    "Create practical applications",
                    &[
                        "User interface development",
                        "Application logic",
                        "Integration testing",
                        "User experience optimization",
                    ],
                ),
                PhaseTemplate::new(
                    "Evaluation and Deployment",
                    3,
                    "Testing, optimization, and deployment",
                    &[
                        "Comprehensive evaluation",
                        "Performance optimization",
                        "Documentation",
                        "Deployment",
                    ],
                ),
            ],
            computer_vision: vec![
                PhaseTemplate::new(
                    "Environment and Data Setup",
                    3,
                    "Prepare development environment and datasets",
                    &[
                        "Development environment setup",
                        "Image dataset collection",
                        "Data preprocessing",
                        "Baseline model research",
                    ],
                ),
                PhaseTemplate::new(
                    "Model Development",
                    6,
                    "Implement core computer vision models",
                    &[
                        "Image preprocessing pipeline",
                        "CNN architecture implementation",
                        "Model training",
                        "Initial evaluation",
                    ],
                ),
                PhaseTemplate::new(
                    "Advanced Techniques",
                    4,
                    "Implement advanced computer vision techniques",
                    &[
                        "Transfer learning",
                        "Data augmentation",
                        "Advanced architectures",
                        "Performance optimization",
                    ],
                ),
                PhaseTemplate::new(
                    "Application Integration",
                    4,
                    "Build practical applications",
                    &[
                        "Real-time processing",
                        "User interface",
                        "API development",
                        "System integration",
                    ],
                ),
                PhaseTemplate::new(
                    "Testing and Deployment",
                    3,
                    "Final testing and deployment",
                    &[
                        "Performance testing",
                        "User acceptance testing",
                        "Production deployment",
                        "Monitoring setup",
                    ],
                ),
            ],
            machine_learning: vec![
                PhaseTemplate::new(
                    "Data and Environment Preparation",
                    3,
                    "Setup and data understanding",
                    &[
                        "Environment configuration",
                        "Data collection and exploration",
                        "Feature engineering",
                        "Data quality assessment",
                    ],
                ),
                PhaseTemplate::new(
                    "Model Development",
                    6,
                    "Develop and train ML models",
                    &[
                        "Algorithm selection",
                        "Model implementation",
                        "Training and validation",
                        "Hyperparameter tuning",
                    ],
                ),
                PhaseTemplate::new(
                    "Advanced Modeling",
                    4,
                    "Implement advanced ML techniques",
                    &[
                        "Ensemble methods",
                        "Deep learning integration",
                        "Model optimization",
                        "Cross-validation",
                    ],
                ),
                PhaseTemplate::new(
                    "System Integration",
                    4,
                    "Build production system",
                    &[
                        "API development",
                        "Database integration",
                        "Real-time prediction",
                        "System architecture",
                    ],
                ),
                PhaseTemplate::new(
                    "Production and Monitoring",
                    3,
                    "Deploy and monitor system",
                    &[
                        "Production deployment",
                        "Performance monitoring",
                        "Model maintenance",
                        "Documentation",
                    ],
                ),
            ],
        }
    }
}

/// Deliverables keyed by phase name; other names get a placeholder
pub(crate) fn base_deliverables(phase_name: &str) -> &'static [&'static str] {
    match phase_name {
        "Foundation and Setup" => &[
            "Development environment setup",
            "Literature review document",
            "Dataset preparation report",
            "Technical specification document",
        ],
        "Core Component Development" => &[
            "Core processing pipeline",
            "Basic model implementations",
            "Initial testing results",
            "Performance baseline report",
        ],
        "Advanced Implementation" => &[
            "Advanced model implementations",
            "Optimization results",
            "Performance improvement report",
            "Technical documentation",
        ],
        "Application Development" => &[
            "User interface prototype",
            "Application backend",
            "Integration testing report",
            "User documentation",
        ],
        "Evaluation and Deployment" => &[
            "Final evaluation report",
            "Optimized production system",
            "Deployment documentation",
            "User manual",
        ],
        _ => &["Phase deliverables"],
    }
}

/// Success criteria keyed by phase name; other names get a placeholder
pub(crate) fn base_success_criteria(phase_name: &str) -> &'static [&'static str] {
    match phase_name {
        "Foundation and Setup" => &[
            "Functional development environment",
            "Complete dataset preparation",
            "Clear project roadmap",
        ],
        "Core Component Development" => &[
            "Working core components",
            "Baseline performance achieved",
            "Successful initial testing",
        ],
        "Advanced Implementation" => &[
            "Improved model performance",
            "Optimization targets met",
            "Advanced features implemented",
        ],
        "Application Development" => &[
            "Functional user interface",
            "Complete application features",
            "User acceptance testing passed",
        ],
        "Evaluation and Deployment" => &[
            "Performance targets achieved",
            "Successful deployment",
            "Complete documentation",
        ],
        _ => &["Phase objectives met"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_domains() {
        assert_eq!(DomainFamily::classify("NLP"), DomainFamily::Nlp);
        assert_eq!(DomainFamily::classify("Natural Language Processing"), DomainFamily::Nlp);
        assert_eq!(DomainFamily::classify("Computer Vision"), DomainFamily::ComputerVision);
        assert_eq!(DomainFamily::classify("image segmentation"), DomainFamily::ComputerVision);
        assert_eq!(DomainFamily::classify("Reinforcement Learning"), DomainFamily::MachineLearning);
        assert_eq!(DomainFamily::classify(""), DomainFamily::MachineLearning);
    }

    #[test]
    fn test_classify_rule_order() {
        // Both rules match; the NLP rule comes first
        assert_eq!(DomainFamily::classify("NLP for image captioning"), DomainFamily::Nlp);
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let builtin = TemplateTable::builtin();
        let table = TemplateTable::new(
            builtin.nlp.clone(),
            builtin.computer_vision.clone(),
            builtin.machine_learning.clone(),
        );
        assert!(table.is_ok());

        for family in [DomainFamily::Nlp, DomainFamily::ComputerVision, DomainFamily::MachineLearning] {
            let weights: Vec<u32> = builtin.family(family).iter().map(|p| p.base_duration).collect();
            assert_eq!(weights, vec![3, 6, 4, 4, 3]);
        }
    }

    #[test]
    fn test_table_rejects_empty_family() {
        let builtin = TemplateTable::builtin();
        let err = TemplateTable::new(builtin.nlp.clone(), vec![], builtin.machine_learning.clone()).unwrap_err();
        assert_eq!(err, PlanError::EmptyTemplateFamily("Computer Vision".to_string()));
    }

    #[test]
    fn test_table_rejects_zero_weight() {
        let builtin = TemplateTable::builtin();
        let mut ml = builtin.machine_learning.clone();
        ml[2].base_duration = 0;
        let err = TemplateTable::new(builtin.nlp.clone(), builtin.computer_vision.clone(), ml).unwrap_err();
        assert!(matches!(err, PlanError::InvalidPhaseWeight { phase, .. } if phase == "Advanced Modeling"));
    }

    #[test]
    fn test_unknown_phase_names_get_placeholders() {
        assert_eq!(base_deliverables("Model Development"), &["Phase deliverables"]);
        assert_eq!(base_success_criteria("Model Development"), &["Phase objectives met"]);
        assert_eq!(base_deliverables("Foundation and Setup").len(), 4);
    }
}
