//! Plan generation
//!
//! Expands an [`AnalysisRecord`] and [`ProjectSettings`] into a
//! [`ProjectPlan`] by template lookup and duration scaling. Apart from the
//! clock, generation is a pure function of its inputs.

use chrono::{DateTime, Duration, Local};
use indexmap::IndexMap;
use tracing::{debug, info};

use super::templates::{DomainFamily, PhaseTemplate, TemplateTable, base_deliverables, base_success_criteria};
use super::types::{
    Complexity, Milestone, Phase, ProjectOverview, ProjectPlan, ProjectSettings, Risk, StackValue, SuccessMetrics,
    Timeline,
};
use crate::analysis::AnalysisRecord;

const MAX_CONCEPT_TASKS: usize = 3;
const MAX_FRAMEWORK_TASKS: usize = 2;
const MAX_STACK_FRAMEWORKS: usize = 3;
const MAX_CHALLENGE_RISKS: usize = 2;
const CHALLENGE_MITIGATION: &str = "Implement targeted solutions and monitoring";

/// Scaled length of one phase in whole months, never below 1
///
/// `f64::round` rounds halves away from zero, which is round-half-up here
/// because every factor is positive.
pub fn scaled_phase_months(base_duration: u32, duration_multiplier: f64, complexity_multiplier: f64) -> u32 {
    let scaled = (f64::from(base_duration) * duration_multiplier * complexity_multiplier).round();
    (scaled as u32).max(1)
}

/// Turns analyses into project plans
#[derive(Debug, Clone, Default)]
pub struct PlanGenerator {
    templates: TemplateTable,
}

impl PlanGenerator {
    pub fn new() -> Self {
        Self::with_templates(TemplateTable::builtin())
    }

    pub fn with_templates(templates: TemplateTable) -> Self {
        debug!("PlanGenerator::with_templates: called");
        Self { templates }
    }

    /// Generate a plan dated now
    pub fn generate(&self, analysis: &AnalysisRecord, settings: &ProjectSettings) -> ProjectPlan {
        self.generate_at(analysis, settings, Local::now())
    }

    /// Generate a plan dated `now`
    pub fn generate_at(&self, analysis: &AnalysisRecord, settings: &ProjectSettings, now: DateTime<Local>) -> ProjectPlan {
        debug!(title = %analysis.title, domain = %analysis.domain, "generate_at: called");
        let family = DomainFamily::classify(&analysis.domain);
        let complexity = settings.complexity();
        info!(
            "Generating {} plan: {} months, team of {}, {}",
            family,
            settings.duration(),
            settings.team_size(),
            complexity
        );

        let phases = self.generate_phases(analysis, settings, family);
        let timeline = Self::timeline(&phases, now);

        ProjectPlan {
            project_overview: ProjectOverview {
                title: format!("{} - Project Plan", analysis.title),
                domain: analysis.domain.clone(),
                complexity: complexity.to_string(),
                estimated_duration: format!("{} months", settings.duration()),
                team_size: settings.team_size(),
                generated_date: now.to_rfc3339(),
            },
            phases,
            technical_stack: Self::technical_stack(analysis, family),
            architecture: Self::architecture(family),
            resources: Self::resources(settings, family),
            risks: Self::risks(analysis, complexity),
            success_metrics: Self::success_metrics(family),
            timeline,
        }
    }

    fn generate_phases(&self, analysis: &AnalysisRecord, settings: &ProjectSettings, family: DomainFamily) -> Vec<Phase> {
        let templates = self.templates.family(family);
        let total_base: u32 = templates.iter().map(|t| t.base_duration).sum();
        let duration_multiplier = f64::from(settings.duration()) / f64::from(total_base);
        let complexity_multiplier = settings.complexity().multiplier();
        debug!(%total_base, %duration_multiplier, %complexity_multiplier, "generate_phases: called");

        let mut phases = Vec::with_capacity(templates.len());
        let mut current_month = 1;
        for template in templates {
            let months = scaled_phase_months(template.base_duration, duration_multiplier, complexity_multiplier);
            phases.push(Phase {
                name: template.name.clone(),
                duration: format!("{} months", months),
                start_month: current_month,
                end_month: current_month + months - 1,
                objectives: template.objectives.clone(),
                tasks: Self::customize_tasks(template, analysis),
                deliverables: Self::deliverables(&template.name, family),
                success_criteria: Self::success_criteria(&template.name, settings.complexity()),
            });
            current_month += months;
        }
        phases
    }

    /// Template tasks plus concept and framework tasks not already covered
    fn customize_tasks(template: &PhaseTemplate, analysis: &AnalysisRecord) -> Vec<String> {
        let mut tasks = template.core_tasks.clone();

        let concepts = analysis
            .key_concepts
            .iter()
            .take(MAX_CONCEPT_TASKS)
            .map(|c| (c, format!("Implement {} functionality", c)));
        let frameworks = analysis
            .technical_requirements
            .frameworks
            .iter()
            .take(MAX_FRAMEWORK_TASKS)
            .map(|f| (f, format!("Integrate {} framework", f)));

        for (needle, task) in concepts.chain(frameworks) {
            let covered = tasks.join(" ").to_lowercase();
            if covered.contains(&needle.to_lowercase()) {
                debug!(%needle, "customize_tasks: already covered");
                continue;
            }
            tasks.push(task);
        }
        tasks
    }

    fn deliverables(phase_name: &str, family: DomainFamily) -> Vec<String> {
        let mut deliverables: Vec<String> = base_deliverables(phase_name).iter().map(|s| s.to_string()).collect();
        if phase_name.contains("Core") {
            deliverables.extend(family.extra_deliverables().iter().map(|s| s.to_string()));
        }
        deliverables
    }

    fn success_criteria(phase_name: &str, complexity: Complexity) -> Vec<String> {
        let mut criteria: Vec<String> = base_success_criteria(phase_name).iter().map(|s| s.to_string()).collect();
        match complexity {
            Complexity::Advanced => criteria.push("Advanced performance benchmarks achieved".to_string()),
            Complexity::Expert => criteria.push("State-of-the-art performance achieved".to_string()),
            Complexity::Beginner | Complexity::Intermediate => {}
        }
        criteria
    }

    fn technical_stack(analysis: &AnalysisRecord, family: DomainFamily) -> IndexMap<String, StackValue> {
        fn list(items: &[&str]) -> StackValue {
            StackValue::List(items.iter().map(|s| s.to_string()).collect())
        }

        let mut stack = IndexMap::new();
        stack.insert("programming_languages".to_string(), list(&["Python"]));
        stack.insert("core_libraries".to_string(), list(&["NumPy", "Pandas", "Matplotlib"]));
        stack.insert("development_tools".to_string(), list(&["Jupyter Notebook", "Git", "VS Code"]));
        stack.insert("testing".to_string(), list(&["Pytest", "Unit Testing"]));
        stack.insert("deployment".to_string(), list(&["Docker", "Flask/FastAPI"]));

        for (category, items) in family.stack_entries() {
            let mut items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
            if *category == "ml_frameworks" {
                for framework in analysis.technical_requirements.frameworks.iter().take(MAX_STACK_FRAMEWORKS) {
                    if !items.contains(framework) {
                        items.push(framework.clone());
                    }
                }
            }
            stack.insert(category.to_string(), StackValue::List(items));
        }
        stack
    }

    fn architecture(family: DomainFamily) -> IndexMap<String, String> {
        family
            .architecture()
            .iter()
            .map(|(layer, description)| (layer.to_string(), description.to_string()))
            .collect()
    }

    fn resources(settings: &ProjectSettings, family: DomainFamily) -> IndexMap<String, String> {
        let mut resources = IndexMap::new();
        resources.insert(
            "team".to_string(),
            format!("{} team members (developers, data scientists, researchers)", settings.team_size()),
        );
        resources.insert(
            "development_environment".to_string(),
            "Modern development machines with good specifications".to_string(),
        );

        let (hardware, cloud) = if settings.complexity().is_demanding() {
            (
                "GPU workstations (8GB+ VRAM), 32GB+ RAM, SSD storage",
                "Cloud GPU instances for training (AWS/GCP/Azure)",
            )
        } else {
            (
                "Standard development machines, GPU recommended",
                "Basic cloud services for deployment",
            )
        };
        resources.insert("hardware".to_string(), hardware.to_string());
        resources.insert("cloud_resources".to_string(), cloud.to_string());

        if let Some(storage) = family.data_storage() {
            resources.insert("data_storage".to_string(), storage.to_string());
        }
        resources
    }

    fn risks(analysis: &AnalysisRecord, complexity: Complexity) -> Vec<Risk> {
        let risk = |risk: &str, mitigation: &str| Risk {
            risk: risk.to_string(),
            mitigation: mitigation.to_string(),
        };

        let mut risks = vec![
            risk(
                "Technical complexity exceeding team capabilities",
                "Provide comprehensive training and consider external consultants",
            ),
            risk(
                "Data quality and availability issues",
                "Establish data quality checks and backup data sources",
            ),
            risk(
                "Performance not meeting requirements",
                "Set realistic benchmarks and implement iterative improvements",
            ),
            risk(
                "Timeline delays due to unforeseen challenges",
                "Build buffer time into schedule and prioritize core features",
            ),
        ];

        if complexity.is_demanding() {
            risks.push(risk(
                "High computational resource requirements",
                "Secure adequate cloud resources and optimize algorithms",
            ));
            risks.push(risk(
                "Keeping up with rapidly evolving research",
                "Establish continuous learning and update procedures",
            ));
        }

        risks.extend(
            analysis
                .challenges
                .iter()
                .take(MAX_CHALLENGE_RISKS)
                .map(|challenge| risk(challenge, CHALLENGE_MITIGATION)),
        );
        risks
    }

    fn success_metrics(family: DomainFamily) -> SuccessMetrics {
        let mut technical_metrics: Vec<String> = [
            "Model accuracy > 85%",
            "System response time < 2 seconds",
            "Code coverage > 80%",
            "Performance benchmarks achieved",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        technical_metrics.extend(family.extra_technical_metrics().iter().map(|s| s.to_string()));

        SuccessMetrics {
            technical_metrics,
            project_metrics: [
                "On-time delivery",
                "Budget adherence",
                "Quality standards met",
                "Stakeholder satisfaction > 4.0/5.0",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    fn timeline(phases: &[Phase], now: DateTime<Local>) -> Timeline {
        let total = phases.iter().map(|p| p.end_month).max().unwrap_or(0);
        debug!(%total, "timeline: called");
        Timeline {
            total_duration: format!("{} months", total),
            start_date: now.format("%Y-%m-%d").to_string(),
            estimated_end_date: (now + Duration::days(i64::from(total) * 30))
                .format("%Y-%m-%d")
                .to_string(),
            milestones: phases
                .iter()
                .map(|p| Milestone {
                    name: format!("{} Completion", p.name),
                    month: p.end_month,
                    description: format!("Complete {} with all deliverables", p.name),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{RawAnalysis, TechnicalRequirements};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn analysis(domain: &str) -> AnalysisRecord {
        AnalysisRecord {
            domain: domain.to_string(),
            ..AnalysisRecord::from_raw(RawAnalysis::default())
        }
    }

    fn settings(duration: u32, team_size: u32, complexity: Complexity) -> ProjectSettings {
        ProjectSettings::new(duration, team_size, complexity).unwrap()
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn months(plan: &ProjectPlan) -> Vec<u32> {
        plan.phases.iter().map(|p| p.months()).collect()
    }

    #[test]
    fn test_scaled_phase_months_rounds_half_up() {
        assert_eq!(scaled_phase_months(5, 0.5, 1.0), 3);
        assert_eq!(scaled_phase_months(3, 1.0, 1.0), 3);
        assert_eq!(scaled_phase_months(1, 0.1, 0.8), 1);
    }

    #[test]
    fn test_computer_vision_advanced_scenario() {
        let plan = PlanGenerator::new().generate_at(
            &analysis("Computer Vision"),
            &settings(26, 6, Complexity::Advanced),
            fixed_now(),
        );

        assert_eq!(plan.phases.len(), 5);
        assert_eq!(plan.phases[0].name, "Environment and Data Setup");
        assert_eq!(months(&plan), vec![5, 10, 7, 7, 5]);
        assert_eq!(plan.phases[0].start_month, 1);
        assert_eq!(plan.phases[4].end_month, 34);
        assert_eq!(plan.phases[1].duration, "10 months");
        assert_eq!(plan.timeline.total_duration, "34 months");
        assert_eq!(plan.resources["team"], "6 team members (developers, data scientists, researchers)");
        assert_eq!(plan.resources["data_storage"], "Image datasets and pre-trained vision models");
        assert_eq!(plan.risks.len(), 6);
        assert!(plan.technical_stack.contains_key("cv_libraries"));
    }

    #[test]
    fn test_transformers_attention_dedup_scenario() {
        let record = AnalysisRecord {
            key_concepts: vec![
                "Transformers".to_string(),
                "Transformers".to_string(),
                "Attention".to_string(),
            ],
            ..analysis("NLP")
        };
        let plan = PlanGenerator::new().generate_at(&record, &settings(20, 5, Complexity::Intermediate), fixed_now());

        for phase in &plan.phases {
            let transformer_tasks = phase.tasks.iter().filter(|t| t.contains("Transformers")).count();
            assert_eq!(transformer_tasks, 1, "phase {}", phase.name);
            assert!(phase.tasks.contains(&"Implement Attention functionality".to_string()));
        }
    }

    #[test]
    fn test_concept_already_in_template_is_skipped() {
        let record = AnalysisRecord {
            key_concepts: vec!["feature extraction".to_string()],
            technical_requirements: TechnicalRequirements {
                frameworks: vec!["PyTorch".to_string(), "JAX".to_string(), "Keras".to_string()],
                ..TechnicalRequirements::default()
            },
            ..analysis("NLP")
        };
        let plan = PlanGenerator::new().generate_at(&record, &settings(20, 5, Complexity::Intermediate), fixed_now());

        let core = &plan.phases[1];
        assert_eq!(core.name, "Core Component Development");
        assert!(!core.tasks.iter().any(|t| t == "Implement feature extraction functionality"));
        assert_eq!(
            &core.tasks[4..],
            &["Integrate PyTorch framework".to_string(), "Integrate JAX framework".to_string()]
        );
    }

    #[test]
    fn test_nlp_deliverables_and_criteria() {
        let plan = PlanGenerator::new().generate_at(
            &analysis("Natural Language Processing"),
            &settings(20, 5, Complexity::Expert),
            fixed_now(),
        );

        let core = &plan.phases[1];
        assert_eq!(core.deliverables.len(), 6);
        assert_eq!(core.deliverables[4], "Text preprocessing pipeline");
        assert_eq!(core.deliverables[5], "Language model implementation");
        assert_eq!(plan.phases[0].deliverables.len(), 4);
        assert_eq!(
            plan.phases[0].success_criteria.last().map(String::as_str),
            Some("State-of-the-art performance achieved")
        );
    }

    #[test]
    fn test_machine_learning_placeholders() {
        let plan = PlanGenerator::new().generate_at(
            &analysis("Reinforcement Learning"),
            &settings(20, 5, Complexity::Advanced),
            fixed_now(),
        );

        assert_eq!(plan.phases[0].name, "Data and Environment Preparation");
        for phase in &plan.phases {
            assert_eq!(phase.deliverables, vec!["Phase deliverables"]);
            assert_eq!(
                phase.success_criteria,
                vec!["Phase objectives met", "Advanced performance benchmarks achieved"]
            );
        }
        assert!(!plan.resources.contains_key("data_storage"));
        assert_eq!(plan.success_metrics.technical_metrics.len(), 4);
    }

    #[test]
    fn test_tech_stack_dedup_preserves_order() {
        let record = AnalysisRecord {
            technical_requirements: TechnicalRequirements {
                frameworks: vec![
                    "PyTorch".to_string(),
                    "JAX".to_string(),
                    "JAX".to_string(),
                    "Flax".to_string(),
                ],
                ..TechnicalRequirements::default()
            },
            ..analysis("Machine Learning")
        };
        let plan = PlanGenerator::new().generate_at(&record, &settings(12, 3, Complexity::Beginner), fixed_now());

        let keys: Vec<&str> = plan.technical_stack.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "programming_languages",
                "core_libraries",
                "development_tools",
                "testing",
                "deployment",
                "ml_frameworks"
            ]
        );
        assert_eq!(
            plan.technical_stack["ml_frameworks"],
            StackValue::List(vec![
                "Scikit-learn".to_string(),
                "TensorFlow".to_string(),
                "PyTorch".to_string(),
                "JAX".to_string(),
            ])
        );
    }

    #[test]
    fn test_risks_from_challenges() {
        let record = AnalysisRecord {
            challenges: vec!["Long training".to_string(), "Memory".to_string(), "Ignored".to_string()],
            ..analysis("NLP")
        };
        let plan = PlanGenerator::new().generate_at(&record, &settings(20, 5, Complexity::Intermediate), fixed_now());

        assert_eq!(plan.risks.len(), 6);
        assert_eq!(plan.risks[4].risk, "Long training");
        assert_eq!(plan.risks[5].mitigation, CHALLENGE_MITIGATION);
        assert!(!plan.risks.iter().any(|r| r.risk == "Ignored"));
    }

    #[test]
    fn test_timeline_and_overview() {
        let record = AnalysisRecord {
            title: "BERT".to_string(),
            ..analysis("NLP")
        };
        let plan = PlanGenerator::new().generate_at(&record, &settings(20, 4, Complexity::Intermediate), fixed_now());

        assert_eq!(plan.project_overview.title, "BERT - Project Plan");
        assert_eq!(plan.project_overview.estimated_duration, "20 months");
        assert_eq!(plan.project_overview.complexity, "Intermediate");
        assert_eq!(months(&plan), vec![3, 6, 4, 4, 3]);
        assert_eq!(plan.timeline.start_date, "2024-03-01");
        // 20 months * 30 days after 2024-03-01
        assert_eq!(plan.timeline.estimated_end_date, "2025-10-22");
        assert_eq!(plan.timeline.milestones.len(), 5);
        assert_eq!(plan.timeline.milestones[0].name, "Foundation and Setup Completion");
        assert_eq!(plan.timeline.milestones[0].month, 3);
    }

    #[test]
    fn test_idempotent_with_pinned_clock() {
        let generator = PlanGenerator::new();
        let record = analysis("Computer Vision");
        let settings = settings(18, 7, Complexity::Expert);
        assert_eq!(
            generator.generate_at(&record, &settings, fixed_now()),
            generator.generate_at(&record, &settings, fixed_now())
        );
    }

    #[test]
    fn test_single_phase_table() {
        let one = vec![PhaseTemplate::new("Only Phase", 2, "Do it", &["Work"])];
        let table = TemplateTable::new(one.clone(), one.clone(), one).unwrap();
        let plan = PlanGenerator::with_templates(table).generate_at(
            &analysis("NLP"),
            &settings(6, 1, Complexity::Beginner),
            fixed_now(),
        );

        assert_eq!(plan.phases.len(), 1);
        assert_eq!(plan.phases[0].start_month, 1);
        // round(2 * 3.0 * 0.8) = round(4.8)
        assert_eq!(plan.phases[0].end_month, 5);
    }

    proptest! {
        #[test]
        fn prop_phases_are_contiguous(
            duration in 6u32..=36,
            team_size in 1u32..=20,
            complexity in prop::sample::select(Complexity::ALL.to_vec()),
            domain in prop::sample::select(vec!["NLP", "Computer Vision", "Machine Learning", "Robotics"]),
        ) {
            let plan = PlanGenerator::new().generate_at(
                &analysis(domain),
                &settings(duration, team_size, complexity),
                fixed_now(),
            );

            prop_assert_eq!(plan.phases.len(), 5);
            prop_assert_eq!(plan.phases[0].start_month, 1);
            for pair in plan.phases.windows(2) {
                prop_assert_eq!(pair[1].start_month, pair[0].end_month + 1);
            }
            for phase in &plan.phases {
                prop_assert!(phase.end_month >= phase.start_month);
                prop_assert_eq!(&phase.duration, &format!("{} months", phase.months()));
            }
        }

        #[test]
        fn prop_span_non_decreasing_in_complexity(
            duration in 6u32..=36,
            domain in prop::sample::select(vec!["NLP", "Computer Vision", "Machine Learning"]),
        ) {
            let generator = PlanGenerator::new();
            let spans: Vec<u32> = Complexity::ALL
                .iter()
                .map(|c| generator.generate_at(&analysis(domain), &settings(duration, 5, *c), fixed_now()).total_months())
                .collect();
            prop_assert!(spans.windows(2).all(|w| w[0] <= w[1]), "spans {:?}", spans);
        }
    }
}
