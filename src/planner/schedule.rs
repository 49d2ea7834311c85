//! Expansion of a goal's duration into per-day entries.
//!
//! A [`Schedule`] is built once from the goal and catalog data and can be
//! iterated any number of times; entries are produced on demand.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use sqlx::PgPool;
use time::{Date, Duration};

use crate::catalog::{
    self,
    repo_types::{DietDay, DietPlan, WorkoutDay, WorkoutPlan},
};
use crate::error::AppResult;
use crate::goals::repo_types::Goal;

/// Diet plans attached to every day of a catalog schedule.
pub const MEALS_PER_DAY: usize = 2;

#[derive(Debug, Clone)]
pub enum DayContent {
    /// Alternating workout/rest days; the same meals every day.
    Catalog {
        workout: Option<WorkoutPlan>,
        meals: Vec<DietPlan>,
    },
    /// Per-day rows of the assigned plans, keyed by 1-based day number.
    Breakdown {
        workout_days: BTreeMap<i32, WorkoutDay>,
        diet_days: BTreeMap<i32, DietDay>,
    },
}

#[derive(Debug, Clone)]
pub struct Schedule {
    start_date: Date,
    duration_days: u32,
    content: DayContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDay<'a> {
    pub day_number: u32,
    pub date: Date,
    pub is_workout: bool,
    pub workout: Option<&'a WorkoutPlan>,
    pub meals: &'a [DietPlan],
    pub workout_day: Option<&'a WorkoutDay>,
    pub diet_day: Option<&'a DietDay>,
}

impl Schedule {
    /// Days past the last representable date are dropped.
    pub fn new(start_date: Date, duration_days: u32, content: DayContent) -> Self {
        let room = Date::MAX.to_julian_day() - start_date.to_julian_day() + 1;
        let duration_days = duration_days.min(u32::try_from(room).unwrap_or(0));
        let content = match content {
            DayContent::Catalog { workout, mut meals } => {
                meals.truncate(MEALS_PER_DAY);
                DayContent::Catalog { workout, meals }
            }
            breakdown => breakdown,
        };
        Self {
            start_date,
            duration_days,
            content,
        }
    }

    pub fn days(&self) -> ScheduleIter<'_> {
        ScheduleIter {
            schedule: self,
            next: 0,
        }
    }

    fn day(&self, index: u32) -> Option<ScheduleDay<'_>> {
        let date = self
            .start_date
            .checked_add(Duration::days(i64::from(index)))?;
        let day_number = index + 1;
        let entry = match &self.content {
            DayContent::Catalog { workout, meals } => {
                let is_workout = index % 2 == 0;
                ScheduleDay {
                    day_number,
                    date,
                    is_workout,
                    workout: if is_workout { workout.as_ref() } else { None },
                    meals: meals.as_slice(),
                    workout_day: None,
                    diet_day: None,
                }
            }
            DayContent::Breakdown {
                workout_days,
                diet_days,
            } => {
                let key = day_number as i32;
                let workout_day = workout_days.get(&key);
                ScheduleDay {
                    day_number,
                    date,
                    is_workout: workout_day.is_some(),
                    workout: None,
                    meals: &[],
                    workout_day,
                    diet_day: diet_days.get(&key),
                }
            }
        };
        Some(entry)
    }
}

pub struct ScheduleIter<'a> {
    schedule: &'a Schedule,
    next: u32,
}

impl<'a> Iterator for ScheduleIter<'a> {
    type Item = ScheduleDay<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.schedule.duration_days {
            return None;
        }
        let day = self.schedule.day(self.next)?;
        self.next += 1;
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.schedule.duration_days.saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ScheduleIter<'_> {}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.days())
    }
}

/// Loads what the goal's schedule needs. Day rows of the assigned plans win
/// over the catalog alternation when any exist.
pub async fn for_goal(db: &PgPool, goal: &Goal) -> AppResult<Schedule> {
    let mut workout_days = BTreeMap::new();
    if let Some(plan_id) = goal.workout_plan_id {
        for d in catalog::repo::workout_days(db, plan_id).await? {
            workout_days.insert(d.day_number, d);
        }
    }
    let mut diet_days = BTreeMap::new();
    if let Some(plan_id) = goal.diet_plan_id {
        for d in catalog::repo::diet_days(db, plan_id).await? {
            diet_days.insert(d.day_number, d);
        }
    }

    let content = if !workout_days.is_empty() || !diet_days.is_empty() {
        DayContent::Breakdown {
            workout_days,
            diet_days,
        }
    } else {
        let plan_type = goal.goal_type();
        DayContent::Catalog {
            workout: catalog::repo::first_workout(db, plan_type, None).await?,
            meals: catalog::repo::list_diets(
                db,
                Some(plan_type),
                Some(goal.diet_type),
                MEALS_PER_DAY as i64,
            )
            .await?,
        }
    };

    Ok(Schedule::new(
        goal.start_date,
        goal.duration_days.max(0) as u32,
        content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repo_types::{DietType, PlanType, WorkoutLevel};
    use time::macros::date;

    fn workout() -> WorkoutPlan {
        WorkoutPlan {
            id: 3,
            title: "Loss Beginner 1".into(),
            plan_type: PlanType::Loss,
            level: WorkoutLevel::Beginner,
            workout_description: "Cardio 30min".into(),
        }
    }

    fn diet(id: i64) -> DietPlan {
        DietPlan {
            id,
            title: format!("Loss Plan {id}"),
            plan_type: PlanType::Loss,
            diet_type: DietType::Veg,
            calories: 1800,
            meals: "Breakfast: Oats".into(),
            medical_issue_suitable: None,
        }
    }

    fn catalog_schedule(days: u32, workout: Option<WorkoutPlan>, meals: Vec<DietPlan>) -> Schedule {
        Schedule::new(date!(2025 - 01 - 30), days, DayContent::Catalog { workout, meals })
    }

    #[test]
    fn thirty_days_split_evenly() {
        let s = catalog_schedule(30, Some(workout()), vec![diet(1)]);
        let days: Vec<_> = s.days().collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days.iter().filter(|d| d.is_workout).count(), 15);
        assert_eq!(days.iter().filter(|d| !d.is_workout).count(), 15);
        for (i, d) in days.iter().enumerate() {
            assert_eq!(d.is_workout, i % 2 == 0);
            assert_eq!(d.workout.is_some(), d.is_workout);
        }
    }

    #[test]
    fn dates_are_consecutive_from_start() {
        let s = catalog_schedule(3, None, vec![]);
        let dates: Vec<_> = s.days().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date!(2025 - 01 - 30), date!(2025 - 01 - 31), date!(2025 - 02 - 01)]
        );
        assert_eq!(s.days().map(|d| d.day_number).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn missing_workout_plan_leaves_days_without_plan() {
        let s = catalog_schedule(4, None, vec![]);
        assert!(s.days().all(|d| d.workout.is_none() && d.meals.is_empty()));
        assert_eq!(s.days().filter(|d| d.is_workout).count(), 2);
    }

    #[test]
    fn meals_capped_at_two_and_repeated() {
        let s = catalog_schedule(5, Some(workout()), vec![diet(1), diet(2), diet(4)]);
        for d in s.days() {
            let ids: Vec<i64> = d.meals.iter().map(|m| m.id).collect();
            assert_eq!(ids, vec![1, 2]);
        }
    }

    #[test]
    fn iteration_is_restartable() {
        let s = catalog_schedule(6, Some(workout()), vec![diet(1)]);
        let first: Vec<_> = s.days().map(|d| (d.date, d.is_workout)).collect();
        let second: Vec<_> = s.days().map(|d| (d.date, d.is_workout)).collect();
        assert_eq!(first, second);
        assert_eq!(s.days().len(), 6);
    }

    #[test]
    fn breakdown_looks_up_by_day_number() {
        let mut workout_days = BTreeMap::new();
        workout_days.insert(
            1,
            WorkoutDay {
                plan_id: 3,
                day_number: 1,
                exercises: "Squats".into(),
            },
        );
        workout_days.insert(
            3,
            WorkoutDay {
                plan_id: 3,
                day_number: 3,
                exercises: "Rows".into(),
            },
        );
        let mut diet_days = BTreeMap::new();
        diet_days.insert(
            2,
            DietDay {
                plan_id: 1,
                day_number: 2,
                breakfast: "Oats".into(),
                mid_morning_snack: "Fruit".into(),
                lunch: "Salad".into(),
                evening_snack: "Yogurt".into(),
                dinner: "Soup".into(),
            },
        );
        let s = Schedule::new(
            date!(2025 - 01 - 01),
            4,
            DayContent::Breakdown {
                workout_days,
                diet_days,
            },
        );
        let days: Vec<_> = s.days().collect();
        assert_eq!(days[0].workout_day.map(|w| w.exercises.as_str()), Some("Squats"));
        assert!(days[0].diet_day.is_none());
        assert!(days[1].workout_day.is_none());
        assert_eq!(days[1].diet_day.map(|d| d.lunch.as_str()), Some("Salad"));
        assert_eq!(days[2].workout_day.map(|w| w.exercises.as_str()), Some("Rows"));
        assert!(days[3].workout_day.is_none() && days[3].diet_day.is_none());
        assert!(!days[3].is_workout);
    }

    #[test]
    fn serializes_as_day_list() {
        let s = catalog_schedule(2, Some(workout()), vec![diet(1)]);
        let json = serde_json::to_value(&s).unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["is_workout"], true);
        assert_eq!(arr[0]["workout"]["title"], "Loss Beginner 1");
        assert!(arr[1]["workout"].is_null());
        assert_eq!(arr[1]["date"], "2025-01-31");
    }

    #[test]
    fn length_stops_at_last_representable_date() {
        let start = Date::MAX.previous_day().unwrap();
        let s = Schedule::new(start, 10, DayContent::Catalog { workout: None, meals: vec![] });
        assert_eq!(s.days().len(), 2);
        assert_eq!(s.days().count(), 2);
        assert_eq!(s.days().last().map(|d| d.date), Some(Date::MAX));
    }

    #[test]
    fn zero_length_schedule_is_empty() {
        let s = catalog_schedule(0, Some(workout()), vec![]);
        assert_eq!(s.days().count(), 0);
    }
}
