//! Portfolio generation request and response shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::cv::PersonalInfo;

/// Payload for POST /api/portfolio/generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    pub resume_id: String,
    pub template: String,
    pub color_theme: String,
    pub sections: Vec<String>,
    pub use_ai_enhancement: bool,
    pub personal_info: PersonalInfo,
}

/// Payload for POST /api/portfolio/ai/enhance: refine one portfolio
/// section from the parsed resume and any content already written.
#[derive(Debug, Clone, Serialize)]
pub struct EnhanceRequest {
    pub prompt: String,
    pub section: String,
    pub resume_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedPortfolio {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub portfolio_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_portfolio_request_serializes_expected_shape() {
        let req = PortfolioRequest {
            resume_id: "r-42".to_string(),
            template: "minimal".to_string(),
            color_theme: "dark".to_string(),
            sections: vec!["about".to_string(), "projects".to_string()],
            use_ai_enhancement: true,
            personal_info: PersonalInfo::default(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["resume_id"], "r-42");
        assert_eq!(value["sections"], json!(["about", "projects"]));
        assert_eq!(value["use_ai_enhancement"], json!(true));
    }

    #[test]
    fn test_enhance_request_omits_absent_existing_content() {
        let req = EnhanceRequest {
            prompt: "polish".to_string(),
            section: "about".to_string(),
            resume_data: json!({}),
            existing_content: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("existing_content").is_none());
    }

    #[test]
    fn test_generated_portfolio_tolerates_sparse_bodies() {
        let resp: GeneratedPortfolio = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.portfolio_id, None);
    }
}
