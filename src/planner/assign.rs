//! Rule-based choice of workout and diet plans for a goal.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::catalog::{
    self,
    repo_types::{DietPlan, DietType, PlanType, WorkoutLevel, WorkoutPlan},
};
use crate::error::AppResult;
use crate::goals::{
    self,
    repo_types::{Goal, GoalStatus},
    services::Transition,
};
use crate::metrics::{self, repo_types::BmiCategory, services::DEFAULT_BMI};
use crate::notifications::GoalEvent;
use crate::profiles::{self, repo_types::UserProfile};

/// Users older than this start at beginner level.
pub const BEGINNER_AGE_THRESHOLD: i32 = 45;

/// Upper bound on catalog rows considered per plan kind.
const CANDIDATE_LIMIT: i64 = 200;

/// Level for a user: beginner when older than 45 or overweight/obese,
/// intermediate otherwise. Advanced is never chosen automatically.
pub fn workout_level(age: i32, category: BmiCategory) -> WorkoutLevel {
    if age > BEGINNER_AGE_THRESHOLD || category.is_heavy() {
        WorkoutLevel::Beginner
    } else {
        WorkoutLevel::Intermediate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanCriteria {
    pub goal_type: PlanType,
    pub level: WorkoutLevel,
    pub diet_type: DietType,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub age: i32,
}

impl PlanCriteria {
    pub fn derive(
        goal: &Goal,
        latest_bmi: Option<f64>,
        age: Option<i32>,
        diet_preference: DietType,
    ) -> Self {
        let bmi = latest_bmi.unwrap_or(DEFAULT_BMI);
        let age = age.unwrap_or(UserProfile::DEFAULT_AGE);
        let bmi_category = BmiCategory::from_bmi(bmi);
        Self {
            goal_type: goal.goal_type(),
            level: workout_level(age, bmi_category),
            diet_type: diet_preference,
            bmi,
            bmi_category,
            age,
        }
    }

    /// A missing profile means default age and the default diet preference.
    pub fn for_profile(goal: &Goal, profile: Option<&UserProfile>, latest_bmi: Option<f64>) -> Self {
        Self::derive(
            goal,
            latest_bmi,
            profile.and_then(|p| p.age),
            profile.map(|p| p.diet_preference).unwrap_or_default(),
        )
    }
}

/// Outcome of plan selection. Either plan may be missing from the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub criteria: PlanCriteria,
    pub workout: Option<WorkoutPlan>,
    pub diet: Option<DietPlan>,
}

impl Selection {
    pub fn workout_id(&self) -> Option<i64> {
        self.workout.as_ref().map(|w| w.id)
    }

    pub fn diet_id(&self) -> Option<i64> {
        self.diet.as_ref().map(|d| d.id)
    }

    /// True when `goal` already references exactly these plans.
    pub fn matches(&self, goal: &Goal) -> bool {
        goal.workout_plan_id == self.workout_id() && goal.diet_plan_id == self.diet_id()
    }
}

/// Lowest-id workout for (goal type, level) and lowest-id diet for
/// (goal type, diet preference) among the given candidates.
pub fn pick(criteria: PlanCriteria, workouts: &[WorkoutPlan], diets: &[DietPlan]) -> Selection {
    let workout = workouts
        .iter()
        .filter(|w| w.plan_type == criteria.goal_type && w.level == criteria.level)
        .min_by_key(|w| w.id)
        .cloned();
    let diet = diets
        .iter()
        .filter(|d| d.plan_type == criteria.goal_type && d.diet_type == criteria.diet_type)
        .min_by_key(|d| d.id)
        .cloned();
    Selection {
        criteria,
        workout,
        diet,
    }
}

/// Picks plans for `goal` from the owner's profile, latest BMI and the catalog.
/// Reads only, so repeated calls agree while catalog and profile are unchanged.
pub async fn select_plans(db: &PgPool, goal: &Goal) -> AppResult<Selection> {
    let profile = profiles::repo::find(db, goal.user_id).await?;
    let latest = metrics::repo::latest(db, goal.user_id).await?;
    let criteria = PlanCriteria::for_profile(goal, profile.as_ref(), latest.map(|r| r.bmi));

    let workouts =
        catalog::repo::list_workouts(db, Some(criteria.goal_type), Some(criteria.level)).await?;
    let diets = catalog::repo::list_diets(
        db,
        Some(criteria.goal_type),
        Some(criteria.diet_type),
        CANDIDATE_LIMIT,
    )
    .await?;
    let selection = pick(criteria, &workouts, &diets);

    if selection.workout.is_none() {
        warn!(goal_id = goal.id, goal_type = ?criteria.goal_type, level = ?criteria.level, "no matching workout plan");
    }
    if selection.diet.is_none() {
        warn!(goal_id = goal.id, goal_type = ?criteria.goal_type, diet_type = ?criteria.diet_type, "no matching diet plan");
    }
    Ok(selection)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Approve the pending goal with the selected plans.
    Approve,
    /// Already approved with the same plans; nothing to write.
    Unchanged,
}

/// What auto-assign does with `goal` given a fresh selection.
pub fn assignment(goal: &Goal, selection: &Selection) -> AppResult<Assignment> {
    if goal.status == GoalStatus::Approved && selection.matches(goal) {
        return Ok(Assignment::Unchanged);
    }
    goal.status.next(Transition::Approve)?;
    Ok(Assignment::Approve)
}

/// Selects plans and approves the goal with them in one write. Running it
/// again on a goal that already holds the same plans changes nothing and
/// emits no event.
pub async fn auto_assign(
    db: &PgPool,
    goal_id: i64,
) -> AppResult<(Goal, Selection, Option<GoalEvent>)> {
    let goal = goals::services::load(db, goal_id).await?;
    if goal.status != GoalStatus::Approved {
        goal.status.next(Transition::Approve)?;
    }

    let selection = select_plans(db, &goal).await?;
    match assignment(&goal, &selection)? {
        Assignment::Unchanged => {
            info!(goal_id, "goal already holds the selected plans");
            Ok((goal, selection, None))
        }
        Assignment::Approve => {
            let (goal, event) = goals::services::approve_with_plans(
                db,
                &goal,
                selection.workout_id(),
                selection.diet_id(),
            )
            .await?;
            info!(goal_id, criteria = ?selection.criteria, "goal auto-assigned");
            Ok((goal, selection, Some(event)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::goals::repo_types::sample_goal;

    fn workout(id: i64, plan_type: PlanType, level: WorkoutLevel) -> WorkoutPlan {
        WorkoutPlan {
            id,
            title: format!("Workout {id}"),
            plan_type,
            level,
            workout_description: "Circuit".into(),
        }
    }

    fn diet(id: i64, plan_type: PlanType, diet_type: DietType) -> DietPlan {
        DietPlan {
            id,
            title: format!("Diet {id}"),
            plan_type,
            diet_type,
            calories: 1800,
            meals: "Breakfast: Oats".into(),
            medical_issue_suitable: None,
        }
    }

    fn catalog() -> (Vec<WorkoutPlan>, Vec<DietPlan>) {
        (
            vec![
                workout(7, PlanType::Loss, WorkoutLevel::Intermediate),
                workout(3, PlanType::Loss, WorkoutLevel::Intermediate),
                workout(2, PlanType::Loss, WorkoutLevel::Beginner),
                workout(1, PlanType::Gain, WorkoutLevel::Intermediate),
            ],
            vec![
                diet(9, PlanType::Loss, DietType::Veg),
                diet(4, PlanType::Loss, DietType::Veg),
                diet(5, PlanType::Loss, DietType::Vegan),
                diet(1, PlanType::Gain, DietType::Veg),
            ],
        )
    }

    fn profile(age: Option<i32>, diet_preference: DietType) -> UserProfile {
        UserProfile {
            user_id: uuid::Uuid::nil(),
            age,
            gender: None,
            height_cm: None,
            weight_kg: None,
            diet_preference,
            medical_issue: None,
        }
    }

    #[test]
    fn level_rules() {
        assert_eq!(workout_level(50, BmiCategory::Normal), WorkoutLevel::Beginner);
        assert_eq!(workout_level(30, BmiCategory::Overweight), WorkoutLevel::Beginner);
        assert_eq!(workout_level(30, BmiCategory::Obese), WorkoutLevel::Beginner);
        assert_eq!(workout_level(30, BmiCategory::Normal), WorkoutLevel::Intermediate);
        assert_eq!(workout_level(45, BmiCategory::Underweight), WorkoutLevel::Intermediate);
    }

    #[test]
    fn criteria_defaults_without_history_or_age() {
        let c = PlanCriteria::derive(&sample_goal(70.0, 60.0), None, None, DietType::Veg);
        assert_eq!(c.bmi, 22.0);
        assert_eq!(c.age, 25);
        assert_eq!(c.bmi_category, BmiCategory::Normal);
        assert_eq!(c.goal_type, PlanType::Loss);
        assert_eq!(c.level, WorkoutLevel::Intermediate);
        assert_eq!(c.diet_type, DietType::Veg);
    }

    #[test]
    fn missing_profile_falls_back_to_defaults() {
        let c = PlanCriteria::for_profile(&sample_goal(70.0, 60.0), None, None);
        assert_eq!(c.age, UserProfile::DEFAULT_AGE);
        assert_eq!(c.diet_type, DietType::default());

        let p = profile(Some(52), DietType::Vegan);
        let c = PlanCriteria::for_profile(&sample_goal(70.0, 60.0), Some(&p), Some(23.0));
        assert_eq!(c.age, 52);
        assert_eq!(c.level, WorkoutLevel::Beginner);
        assert_eq!(c.diet_type, DietType::Vegan);
    }

    #[test]
    fn pick_takes_lowest_id_per_kind() {
        let (workouts, diets) = catalog();
        let c = PlanCriteria::derive(&sample_goal(70.0, 60.0), None, None, DietType::Veg);
        let s = pick(c, &workouts, &diets);
        assert_eq!(s.workout_id(), Some(3));
        assert_eq!(s.diet_id(), Some(4));
    }

    #[test]
    fn pick_leaves_plans_unassigned_on_catalog_miss() {
        let (workouts, diets) = catalog();
        let mut goal = sample_goal(60.0, 70.0);
        goal.diet_type = DietType::Veg;
        let c = PlanCriteria::derive(&goal, Some(31.0), None, DietType::NonVeg);
        assert_eq!(c.level, WorkoutLevel::Beginner);

        let s = pick(c, &workouts, &diets);
        assert!(s.workout.is_none());
        assert!(s.diet.is_none());

        let s = pick(c, &[], &[]);
        assert_eq!((s.workout_id(), s.diet_id()), (None, None));
    }

    #[test]
    fn pick_follows_profile_diet_not_goal_diet() {
        let (workouts, diets) = catalog();
        let mut goal = sample_goal(70.0, 60.0);
        goal.diet_type = DietType::Veg;
        let p = profile(None, DietType::Vegan);
        let c = PlanCriteria::for_profile(&goal, Some(&p), None);

        let s = pick(c, &workouts, &diets);
        assert_eq!(s.diet_id(), Some(5));
        assert_eq!(s.diet.map(|d| d.diet_type), Some(DietType::Vegan));
    }

    #[test]
    fn pending_goal_gets_approved() {
        let (workouts, diets) = catalog();
        let goal = sample_goal(70.0, 60.0);
        let c = PlanCriteria::for_profile(&goal, None, None);
        let s = pick(c, &workouts, &diets);
        assert_eq!(assignment(&goal, &s).unwrap(), Assignment::Approve);
    }

    #[test]
    fn repeated_auto_assign_keeps_the_same_plans() {
        let (workouts, diets) = catalog();
        let mut goal = sample_goal(70.0, 60.0);
        let c = PlanCriteria::for_profile(&goal, None, None);

        let first = pick(c, &workouts, &diets);
        assert_eq!(assignment(&goal, &first).unwrap(), Assignment::Approve);
        goal.status = GoalStatus::Approved;
        goal.workout_plan_id = first.workout_id();
        goal.diet_plan_id = first.diet_id();

        let second = pick(c, &workouts, &diets);
        assert_eq!(
            (second.workout_id(), second.diet_id()),
            (first.workout_id(), first.diet_id())
        );
        assert_eq!(assignment(&goal, &second).unwrap(), Assignment::Unchanged);
    }

    #[test]
    fn approved_goal_with_other_plans_is_not_reassigned() {
        let (workouts, diets) = catalog();
        let mut goal = sample_goal(70.0, 60.0);
        goal.status = GoalStatus::Approved;
        goal.workout_plan_id = Some(7);
        goal.diet_plan_id = Some(4);

        let s = pick(PlanCriteria::for_profile(&goal, None, None), &workouts, &diets);
        assert!(matches!(
            assignment(&goal, &s),
            Err(AppError::InvalidTransition {
                from: GoalStatus::Approved,
                ..
            })
        ));
    }

    #[test]
    fn terminal_goals_refuse_auto_assign() {
        let (workouts, diets) = catalog();
        let mut goal = sample_goal(70.0, 60.0);
        goal.status = GoalStatus::Rejected;
        let s = pick(PlanCriteria::for_profile(&goal, None, None), &workouts, &diets);
        assert!(assignment(&goal, &s).is_err());
    }
}
