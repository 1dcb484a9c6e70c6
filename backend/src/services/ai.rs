//! AI text features: catalog estimates, coaching insight and fitness plan.
//!
//! Estimates need the model and fail with 503 when it is not configured.
//! Coaching text always answers, falling back to static templates.

use crate::ai::{AiError, TextGenerator};
use crate::error::ApiError;
use crate::services::ProfileService;
use crate::telemetry;
use gym_freak_shared::coaching::{
    coach_insight_prompt, extract_json, fallback_insight, fallback_plan, fitness_plan_prompt,
    food_estimate_prompt, workout_estimate_prompt, CoachStats, FitnessPlan, PlanSubject,
};
use gym_freak_shared::types::{
    CoachInsightResponse, DashboardResponse, EstimateRequest, FitnessPlanResponse, FoodEstimate,
    TextSource, WorkoutEstimate,
};
use gym_freak_shared::{DerivedMetrics, User};
use tracing::{info, warn};
use validator::Validate;

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::NotConfigured => ApiError::ServiceUnavailable("AI service is not configured".to_string()),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

pub struct AiService;

impl AiService {
    fn require(ai: Option<&dyn TextGenerator>) -> Result<&dyn TextGenerator, ApiError> {
        ai.ok_or_else(|| AiError::NotConfigured.into())
    }

    async fn generate_json<T: serde::de::DeserializeOwned>(
        ai: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<T, AiError> {
        let text = ai.generate(prompt).await?;
        extract_json(&text).map_err(|e| AiError::InvalidFormat(e.to_string()))
    }

    pub async fn estimate_food(
        ai: Option<&dyn TextGenerator>,
        req: EstimateRequest,
    ) -> Result<FoodEstimate, ApiError> {
        req.validate()?;
        let ai = Self::require(ai)?;

        let estimate: FoodEstimate = Self::generate_json(ai, &food_estimate_prompt(req.query.trim())).await?;
        if estimate.serving_size <= 0.0 || estimate.calories < 0.0 {
            return Err(AiError::InvalidFormat("nutrient values out of range".to_string()).into());
        }
        Ok(estimate)
    }

    pub async fn estimate_workout(
        ai: Option<&dyn TextGenerator>,
        req: EstimateRequest,
    ) -> Result<WorkoutEstimate, ApiError> {
        req.validate()?;
        let ai = Self::require(ai)?;

        let estimate: WorkoutEstimate =
            Self::generate_json(ai, &workout_estimate_prompt(req.query.trim())).await?;
        if !(estimate.met > 0.0 && estimate.met.is_finite()) {
            return Err(AiError::InvalidFormat("MET must be positive".to_string()).into());
        }
        Ok(estimate)
    }

    pub fn coach_stats(dashboard: &DashboardResponse) -> CoachStats {
        CoachStats {
            goal: dashboard.user.goal.as_deref().and_then(|g| g.parse().ok()),
            consumed_calories: dashboard.consumed.calories,
            consumed_protein: dashboard.consumed.protein,
            consumed_carbs: dashboard.consumed.carbs,
            consumed_fat: dashboard.consumed.fat,
            burned: dashboard.burned,
            targets: dashboard.targets,
        }
    }

    /// Short coaching note for the day; never fails
    pub async fn coach_insight(ai: Option<&dyn TextGenerator>, dashboard: &DashboardResponse) -> CoachInsightResponse {
        if let Some(ai) = ai {
            let prompt = coach_insight_prompt(&Self::coach_stats(dashboard));
            match ai.generate(&prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    return CoachInsightResponse {
                        insight: text.trim().to_string(),
                        source: TextSource::Ai,
                    };
                }
                Ok(_) => warn!("Coach insight came back empty, using fallback"),
                Err(e) => warn!(error = %e, "Coach insight failed, using fallback"),
            }
        } else {
            info!("AI disabled, serving static coach insight");
        }

        telemetry::record_ai_fallback("coach_insight");
        CoachInsightResponse {
            insight: fallback_insight(dashboard.remaining).to_string(),
            source: TextSource::Fallback,
        }
    }

    pub fn plan_subject(user: &User) -> PlanSubject {
        PlanSubject {
            name: user.name.clone(),
            age: user.age,
            gender: user.gender.clone(),
            height: user.height,
            weight: user.weight,
            goal: ProfileService::metrics_profile(user).goal,
            activity_level: user.activity_level.clone(),
        }
    }

    /// Personalised plan; static templates for the user's goal when the model is unavailable
    pub async fn fitness_plan(
        ai: Option<&dyn TextGenerator>,
        user: &User,
        metrics: &DerivedMetrics,
    ) -> FitnessPlanResponse {
        let subject = Self::plan_subject(user);

        if let Some(ai) = ai {
            let prompt = fitness_plan_prompt(&subject, &metrics.targets);
            match Self::generate_json::<FitnessPlan>(ai, &prompt).await {
                Ok(plan) => {
                    return FitnessPlanResponse {
                        plan,
                        source: TextSource::Ai,
                    };
                }
                Err(e) => warn!(error = %e, "Fitness plan failed, using fallback"),
            }
        }

        telemetry::record_ai_fallback("fitness_plan");
        let targets = metrics.is_computed().then_some(&metrics.targets);
        FitnessPlanResponse {
            plan: fallback_plan(subject.goal, targets),
            source: TextSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use gym_freak_shared::{ExerciseType, Goal, MacroTargets, MuscleGroup, Nutrients};
    use uuid::Uuid;

    /// Replies with canned text, or the given error
    struct StubGenerator(Result<String, fn() -> AiError>);

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn replying(text: &str) -> StubGenerator {
        StubGenerator(Ok(text.to_string()))
    }

    fn failing() -> StubGenerator {
        StubGenerator(Err(|| AiError::Http("connection reset".to_string())))
    }

    fn user(goal: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "kai@example.com".to_string(),
            name: Some("Kai".to_string()),
            age: None,
            gender: None,
            height: None,
            weight: None,
            activity_level: None,
            goal: goal.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dashboard(remaining: i64) -> DashboardResponse {
        DashboardResponse {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            user: user(Some("loss")),
            metrics: DerivedMetrics::default(),
            targets: MacroTargets::default(),
            consumed: Nutrients {
                calories: 1200.0,
                protein: 80.0,
                carbs: 120.0,
                fat: 40.0,
            },
            burned: 300,
            water: 1500,
            remaining,
        }
    }

    fn query(q: &str) -> EstimateRequest {
        EstimateRequest { query: q.to_string() }
    }

    #[tokio::test]
    async fn test_estimate_food_parses_fenced_json() {
        let ai = replying(
            "```json\n{\"name\": \"Apple\", \"calories\": 52, \"protein\": 0.3, \"carbs\": 14, \"fat\": 0.2, \"serving_size\": 100, \"unit\": \"g\"}\n```",
        );
        let estimate = AiService::estimate_food(Some(&ai), query("apple")).await.unwrap();
        assert_eq!(estimate.name, "Apple");
        assert_eq!(estimate.calories, 52.0);
    }

    #[tokio::test]
    async fn test_estimate_without_ai_is_unavailable() {
        let result = AiService::estimate_food(None, query("apple")).await;
        assert!(matches!(result, Err(ApiError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_estimate_requires_query() {
        let ai = replying("{}");
        let result = AiService::estimate_workout(Some(&ai), query("")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_estimate_workout_rejects_garbage() {
        let ai = replying("I think it's about six.");
        let result = AiService::estimate_workout(Some(&ai), query("rowing")).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_estimate_workout() {
        let ai = replying(r#"{"name": "Bench Press", "met": 6.0, "type": "strength", "muscle_group": "Chest"}"#);
        let estimate = AiService::estimate_workout(Some(&ai), query("bench")).await.unwrap();
        assert_eq!(estimate.exercise_type, ExerciseType::Strength);
        assert_eq!(estimate.muscle_group, Some(MuscleGroup::Chest));
    }

    #[tokio::test]
    async fn test_coach_insight_from_ai() {
        let ai = replying("  Great protein today!  ");
        let response = AiService::coach_insight(Some(&ai), &dashboard(0)).await;
        assert_eq!(response.insight, "Great protein today!");
        assert_eq!(response.source, TextSource::Ai);
    }

    #[tokio::test]
    async fn test_coach_insight_falls_back_on_error() {
        let response = AiService::coach_insight(Some(&failing()), &dashboard(800)).await;
        assert_eq!(response.source, TextSource::Fallback);
        assert_eq!(response.insight, fallback_insight(800));
    }

    #[tokio::test]
    async fn test_coach_insight_without_ai() {
        let response = AiService::coach_insight(None, &dashboard(-500)).await;
        assert_eq!(response.insight, fallback_insight(-500));
    }

    #[test]
    fn test_coach_stats_reads_goal() {
        let stats = AiService::coach_stats(&dashboard(0));
        assert_eq!(stats.goal, Some(Goal::Loss));
        assert_eq!(stats.burned, 300);
    }

    #[tokio::test]
    async fn test_fitness_plan_from_ai() {
        let ai = replying(r#"Here you go: {"workout_plan": "w", "nutrition_plan": "n", "pro_tip": "t"}"#);
        let response = AiService::fitness_plan(Some(&ai), &user(None), &DerivedMetrics::default()).await;
        assert_eq!(response.source, TextSource::Ai);
        assert_eq!(response.plan.pro_tip, "t");
    }

    #[tokio::test]
    async fn test_fitness_plan_falls_back_to_goal_template() {
        let response = AiService::fitness_plan(Some(&failing()), &user(Some("gain")), &DerivedMetrics::default()).await;
        assert_eq!(response.source, TextSource::Fallback);
        assert_eq!(response.plan, fallback_plan(Some(Goal::Gain), None));
    }
}
