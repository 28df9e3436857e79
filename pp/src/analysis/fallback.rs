//! Canned analyses used when the model can't be reached or understood

use super::record::{AnalysisRecord, TechnicalRequirements};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Record built when the reply held no decodable JSON object
///
/// The abstract keeps the first 500 characters of the reply so the user can
/// see what the model actually said.
pub fn parse_fallback(reply: &str) -> AnalysisRecord {
    let abstract_text = if reply.chars().count() > 500 {
        format!("{}...", reply.chars().take(500).collect::<String>())
    } else {
        reply.to_string()
    };

    AnalysisRecord {
        title: "Research Paper Analysis".to_string(),
        authors: "Not specified".to_string(),
        abstract_text,
        domain: "Computer Science".to_string(),
        research_type: "Research Paper".to_string(),
        year: "2024".to_string(),
        complexity: "Intermediate".to_string(),
        key_concepts: strings(&["Machine Learning", "Data Analysis", "Implementation"]),
        methodologies: strings(&["Experimental", "Comparative Analysis"]),
        technical_requirements: TechnicalRequirements {
            programming_languages: strings(&["Python"]),
            frameworks: strings(&["TensorFlow", "PyTorch", "Scikit-learn"]),
            hardware: strings(&["GPU recommended", "8GB+ RAM"]),
            datasets: strings(&["Custom dataset required"]),
        },
        applications: strings(&["Research Implementation", "Practical Application"]),
        challenges: strings(&["Data Quality", "Model Performance", "Scalability"]),
        future_work: strings(&["Optimization", "Extension", "Real-world Deployment"]),
    }
}

/// Record built when the API call itself failed
pub fn transport_fallback() -> AnalysisRecord {
    AnalysisRecord {
        title: "Research Paper".to_string(),
        authors: "Unknown".to_string(),
        abstract_text: "Analysis unavailable - please check your API configuration".to_string(),
        domain: "Computer Science".to_string(),
        research_type: "Research Paper".to_string(),
        year: "2024".to_string(),
        complexity: "Intermediate".to_string(),
        key_concepts: strings(&["Research", "Implementation"]),
        methodologies: strings(&["Analysis"]),
        technical_requirements: TechnicalRequirements {
            programming_languages: strings(&["Python"]),
            frameworks: strings(&["Standard libraries"]),
            hardware: strings(&["Standard hardware"]),
            datasets: strings(&["TBD"]),
        },
        applications: strings(&["Research"]),
        challenges: strings(&["Implementation"]),
        future_work: strings(&["Development"]),
    }
}
