//! Prompt templates for the five analysis stages
//!
//! Each template names its placeholders in `{camelCase}` and embeds the JSON
//! shape the stage payload parser expects back.

use crate::pipeline::Stage;

/// A fixed prompt template for one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub stage: Stage,
    pub text: &'static str,
    /// Variables the orchestrator must supply
    pub placeholders: &'static [&'static str],
}

pub const VALIDATION_TEMPLATE: &str = r#"
You are a startup validation expert. Decide whether the following input is a genuine startup idea or nonsense.

Input: {input}

Your task:
1. Decide if this is a real business idea worth a full analysis
2. If it is nonsense, write witty but professional satirical feedback
3. If it is valid, clean up and clarify the wording
4. Extract the core business concept, the target market and the value proposition

Respond in this JSON format:
{
  "isValid": boolean,
  "sanitizedInput": "cleaned version of the idea",
  "satiricalFeedback": "funny response, or null when the idea is valid",
  "coreBusinessConcept": "brief summary",
  "targetMarket": "customer description",
  "valueProposition": "unique value offered"
}"#;

pub const SCORING_TEMPLATE: &str = r#"
You are a venture capital analyst. Assess this startup:

Startup Idea: {sanitizedInput}
Core Concept: {coreBusinessConcept}
Target Market: {targetMarket}
Value Proposition: {valueProposition}

Rate each dimension from 0 to 10 (10 = exceptional):
- Market Size: size of the addressable market
- Competition: how favorable the competitive landscape is (10 = little competition)
- Feasibility: how realistic execution is
- Monetization: revenue potential
- Scalability: growth potential

Respond in this JSON format:
{
  "scores": {
    "marketSize": number,
    "competition": number,
    "feasibility": number,
    "monetization": number,
    "scalability": number,
    "overall": number
  },
  "pros": ["4-6 specific strengths"],
  "cons": ["4-6 specific challenges"],
  "benchmarkComparison": "comparison to successful startups"
}"#;

pub const IMPROVEMENT_TEMPLATE: &str = r#"
You are a startup strategy consultant. Suggest improvements for:

Idea: {sanitizedInput}
Overall Score: {overallScore}/10
Strengths: {pros}
Challenges: {cons}

Respond in this JSON format:
{
  "improvements": {
    "productMarketFit": ["4-5 ways to serve the market better"],
    "branding": ["4-5 positioning recommendations"],
    "pricing": ["3-4 pricing strategy options"],
    "mvpFeatures": ["5-6 must-have MVP features"]
  }
}"#;

pub const FUNDING_TEMPLATE: &str = r#"
You are a fundraising expert who has helped raise over $500M. Build a funding strategy for:

Idea: {sanitizedInput}
Overall Score: {overallScore}/10
Market Size: {marketSize}/10
Scalability: {scalability}/10
Strategic Focus: {improvements}

Respond in this JSON format:
{
  "fundingStrategy": {
    "investorTypes": ["specific investor types"],
    "pitchOutline": ["8-10 pitch deck elements"],
    "specificInvestors": ["5-7 named investors with reasoning"],
    "networkingTips": ["4-5 introduction strategies"],
    "timeline": "fundraising timeline with milestones"
  }
}"#;

pub const LAUNCH_TEMPLATE: &str = r#"
You are a growth marketing expert. Create a launch plan for:

Idea: {sanitizedInput}
Target Market: {targetMarket}
Value Proposition: {valueProposition}
Strategic Improvements: {improvements}
Funding Strategy: {fundingStrategy}

Respond in this JSON format:
{
  "launchPlan": {
    "earlyAdopters": ["5-6 channels for the first 100 users"],
    "launchPlatforms": ["4-5 announcement platforms"],
    "communityBuilding": ["4-5 engagement strategies"],
    "keyMetrics": ["6-8 essential KPIs"],
    "ninetyDayPlan": ["10-12 action items with timelines"]
  }
}"#;

const TEMPLATES: [PromptTemplate; 5] = [
    PromptTemplate {
        stage: Stage::Validation,
        text: VALIDATION_TEMPLATE,
        placeholders: &["input"],
    },
    PromptTemplate {
        stage: Stage::Scoring,
        text: SCORING_TEMPLATE,
        placeholders: &[
            "sanitizedInput",
            "coreBusinessConcept",
            "targetMarket",
            "valueProposition",
        ],
    },
    PromptTemplate {
        stage: Stage::Improvement,
        text: IMPROVEMENT_TEMPLATE,
        placeholders: &["sanitizedInput", "overallScore", "pros", "cons"],
    },
    PromptTemplate {
        stage: Stage::Funding,
        text: FUNDING_TEMPLATE,
        placeholders: &[
            "sanitizedInput",
            "overallScore",
            "marketSize",
            "scalability",
            "improvements",
        ],
    },
    PromptTemplate {
        stage: Stage::Launch,
        text: LAUNCH_TEMPLATE,
        placeholders: &[
            "sanitizedInput",
            "targetMarket",
            "valueProposition",
            "improvements",
            "fundingStrategy",
        ],
    },
];

/// Returns the template for a stage
pub fn template_for(stage: Stage) -> &'static PromptTemplate {
    &TEMPLATES[stage.index() - 1]
}

/// All templates in pipeline order
pub fn all_templates() -> &'static [PromptTemplate] {
    &TEMPLATES
}
