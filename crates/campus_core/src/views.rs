//! Derived views.
//!
//! Everything here is computed from the registry on demand and never
//! stored.

use crate::change_feed::{ChangeEvent, ChangeType};
use crate::entity::{EntityKind, Grades, Student};
use crate::registry::Registry;
use serde::Serialize;
use std::fmt;

/// Returns the mean of all scores, or zero when there are none.
#[must_use]
pub fn average_score(grades: &Grades) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }
    grades.values().sum::<f64>() / grades.len() as f64
}

/// Formats an average with exactly two decimals.
#[must_use]
pub fn format_average(average: f64) -> String {
    format!("{average:.2}")
}

/// Returns up to `n` students ordered by descending average score.
///
/// Averages are compared as displayed, rounded to two decimals. The sort
/// is stable: students whose averages display the same keep their
/// collection order.
#[must_use]
pub fn top_students(students: &[Student], n: usize) -> Vec<&Student> {
    let mut ranked: Vec<(&Student, f64)> = students
        .iter()
        .map(|s| (s, displayed_average(s.average_score())))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(n).map(|(s, _)| s).collect()
}

/// The value [`format_average`] shows for `average`.
fn displayed_average(average: f64) -> f64 {
    format_average(average).parse().unwrap_or(average)
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// University name.
    pub university: String,
    /// University address.
    pub address: String,
    /// Number of students.
    pub students: usize,
    /// Number of faculty members.
    pub faculty: usize,
    /// Number of courses.
    pub courses: usize,
    /// Number of departments.
    pub departments: usize,
    /// Mean of the students' averages, zero without students.
    pub average_score: f64,
}

/// Computes the dashboard summary.
#[must_use]
pub fn summary(registry: &Registry) -> Summary {
    let students = registry.students();
    let average_score = if students.is_empty() {
        0.0
    } else {
        students.iter().map(Student::average_score).sum::<f64>() / students.len() as f64
    };

    Summary {
        university: registry.university().name.clone(),
        address: registry.university().address.clone(),
        students: students.len(),
        faculty: registry.faculty().len(),
        courses: registry.courses().len(),
        departments: registry.departments().len(),
        average_score,
    }
}

/// Per-department head counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    /// Department identifier.
    pub id: String,
    /// Department name.
    pub name: String,
    /// Head of department.
    pub head: String,
    /// Students whose department name matches.
    pub students: usize,
    /// Faculty members whose department name matches.
    pub faculty: usize,
    /// Courses in the department's course set.
    pub courses: usize,
}

/// Computes per-department statistics, in department order.
#[must_use]
pub fn department_breakdown(registry: &Registry) -> Vec<DepartmentStats> {
    registry
        .departments()
        .iter()
        .map(|d| DepartmentStats {
            id: d.id.clone(),
            name: d.name.clone(),
            head: d.head_of_department.clone(),
            students: registry.students().iter().filter(|s| s.department == d.name).count(),
            faculty: registry.faculty().iter().filter(|f| f.department == d.name).count(),
            courses: d.courses.len(),
        })
        .collect()
}

/// The screens of the application, used to decide what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum View {
    /// Counts and top students.
    Dashboard,
    /// Student table.
    Students,
    /// Faculty table.
    Faculty,
    /// Course table.
    Courses,
    /// Department table.
    Departments,
    /// University profile and storage settings.
    Settings,
}

impl View {
    /// All views.
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Students,
        View::Faculty,
        View::Courses,
        View::Departments,
        View::Settings,
    ];

    /// Returns the view listing records of `kind`.
    #[must_use]
    pub const fn listing(kind: EntityKind) -> View {
        match kind {
            EntityKind::Student => View::Students,
            EntityKind::Faculty => View::Faculty,
            EntityKind::Course => View::Courses,
            EntityKind::Department => View::Departments,
        }
    }

    /// Returns the views made stale by `event`.
    ///
    /// Changes to a record also invalidate the listings of every kind it
    /// cross-references, and the dashboard.
    #[must_use]
    pub fn affected_by(event: &ChangeEvent) -> Vec<View> {
        let kind = match (event.change_type, event.kind) {
            (ChangeType::Reload, _) | (_, None) => return View::ALL.to_vec(),
            (_, Some(kind)) => kind,
        };

        let mut views = vec![View::Dashboard, View::listing(kind)];
        let related: &[EntityKind] = match kind {
            EntityKind::Student => &[EntityKind::Course],
            EntityKind::Faculty => &[EntityKind::Course],
            EntityKind::Course => &[EntityKind::Student, EntityKind::Faculty, EntityKind::Department],
            EntityKind::Department => &[],
        };
        views.extend(related.iter().map(|&k| View::listing(k)));
        views.sort();
        views
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Dashboard => "dashboard",
            View::Students => "students",
            View::Faculty => "faculty",
            View::Courses => "courses",
            View::Departments => "departments",
            View::Settings => "settings",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(id: &str, scores: &[f64]) -> Student {
        let mut student = Student::new(id, id, 20, "", "");
        for (i, score) in scores.iter().enumerate() {
            student = student.with_grade(format!("C{i}"), *score);
        }
        student
    }

    #[test]
    fn average_of_two_scores() {
        let student = Student::new("STU001", "Alice", 20, "Female", "CS")
            .with_grade("CS101", 3.7)
            .with_grade("MATH101", 3.9);
        assert_eq!(format_average(student.average_score()), "3.80");
    }

    #[test]
    fn no_scores_average_zero() {
        assert_eq!(average_score(&Grades::new()), 0.0);
        assert_eq!(format_average(0.0), "0.00");
    }

    #[test]
    fn top_three_is_stable() {
        let students = vec![
            graded("first", &[3.8]),
            graded("second", &[3.5]),
            graded("third", &[4.0]),
            graded("fourth", &[3.5]),
            graded("fifth", &[3.7]),
        ];
        let ids: Vec<&str> = top_students(&students, 3).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["third", "first", "fifth"]);

        let all: Vec<&str> = top_students(&students, 10).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(all, ["third", "first", "fifth", "second", "fourth"]);
    }

    #[test]
    fn averages_that_display_alike_tie() {
        let students = vec![
            graded("lower", &[3.801]),
            graded("higher", &[3.804]),
            graded("best", &[3.9]),
        ];
        let ids: Vec<&str> = top_students(&students, 3).iter().map(|s| s.id.as_str()).collect();
        // 3.801 and 3.804 both show as 3.80
        assert_eq!(ids, ["best", "lower", "higher"]);
    }

    #[test]
    fn summary_of_empty_registry() {
        let summary = summary(&Registry::new());
        assert_eq!(summary.students, 0);
        assert_eq!(summary.average_score, 0.0);
    }

    #[test]
    fn course_changes_touch_related_listings() {
        let event = ChangeEvent::new(1, ChangeType::Delete, Some(EntityKind::Course), "CS101");
        assert_eq!(
            View::affected_by(&event),
            [View::Dashboard, View::Students, View::Faculty, View::Courses, View::Departments]
        );
    }

    #[test]
    fn reload_touches_everything() {
        let event = ChangeEvent::new(7, ChangeType::Reload, None, "");
        assert_eq!(View::affected_by(&event), View::ALL);
    }
}
