//! Tenant-level analytics: student risk scoring and teacher activity KPIs.

use std::collections::BTreeMap;

use orchestrator_core::identity::UserId;
use orchestrator_core::school::assignment::{Assignment, AssignmentStatus};
use orchestrator_core::school::class::Class;
use orchestrator_core::school::student::{LearningSignals, Student};
use orchestrator_core::settings::analytics::AnalyticsSettings;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentRisk {
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<Uuid>,
    /// 0 (no risk) to 100.
    pub score: f64,
    pub level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RiskReport {
    pub students: Vec<StudentRisk>,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeacherKpi {
    pub teacher_id: UserId,
    pub classes: usize,
    pub assignments: usize,
    pub published: usize,
    pub validated: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeacherReport {
    pub teachers: Vec<TeacherKpi>,
}

/// Weighted risk score for one student, rounded to one decimal.
pub fn risk_score(signals: &LearningSignals, settings: &AnalyticsSettings) -> f64 {
    let weights = &settings.weights;
    let total = weights.score + weights.completion + weights.inactivity;
    if total <= 0.0 {
        return 0.0;
    }

    let score = (100.0 - signals.average_score.clamp(0.0, 100.0)) / 100.0;
    let completion = 1.0 - signals.completion_rate.clamp(0.0, 1.0);
    let inactivity = if settings.inactivity_horizon_days == 0 {
        if signals.days_inactive > 0 {
            1.0
        } else {
            0.0
        }
    } else {
        (f64::from(signals.days_inactive) / f64::from(settings.inactivity_horizon_days)).min(1.0)
    };

    let weighted = weights.score * score
        + weights.completion * completion
        + weights.inactivity * inactivity;
    (weighted / total * 1000.0).round() / 10.0
}

pub fn risk_level(score: f64, settings: &AnalyticsSettings) -> RiskLevel {
    if score >= settings.thresholds.high {
        RiskLevel::High
    } else if score >= settings.thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Highest risk first.
pub fn risk_report(students: &[Student], settings: &AnalyticsSettings) -> RiskReport {
    let mut entries: Vec<StudentRisk> = students
        .iter()
        .map(|student| {
            let score = risk_score(&student.signals, settings);
            StudentRisk {
                student_id: student.id,
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                class_id: student.class_id,
                score,
                level: risk_level(score, settings),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.student_id.cmp(&b.student_id)));

    let count = |level: RiskLevel| entries.iter().filter(|e| e.level == level).count();
    RiskReport {
        high: count(RiskLevel::High),
        medium: count(RiskLevel::Medium),
        low: count(RiskLevel::Low),
        students: entries,
    }
}

fn kpi_for<'a>(kpis: &'a mut BTreeMap<UserId, TeacherKpi>, teacher: &UserId) -> &'a mut TeacherKpi {
    kpis.entry(teacher.clone()).or_insert_with(|| TeacherKpi {
        teacher_id: teacher.clone(),
        classes: 0,
        assignments: 0,
        published: 0,
        validated: 0,
    })
}

/// Per-teacher activity, keyed by class assignments and authored work.
pub fn teacher_report(classes: &[Class], assignments: &[Assignment]) -> TeacherReport {
    let mut kpis: BTreeMap<UserId, TeacherKpi> = BTreeMap::new();

    for class in classes {
        if let Some(teacher) = &class.teacher_id {
            kpi_for(&mut kpis, teacher).classes += 1;
        }
    }
    for assignment in assignments {
        let kpi = kpi_for(&mut kpis, &assignment.owner_id);
        kpi.assignments += 1;
        if assignment.status == AssignmentStatus::Published {
            kpi.published += 1;
        }
        if assignment.validated_at.is_some() {
            kpi.validated += 1;
        }
    }

    TeacherReport {
        teachers: kpis.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::school::assignment::CreateAssignmentRequest;
    use orchestrator_core::school::student::CreateStudentRequest;
    use orchestrator_core::tenant::TenantId;

    fn student(average_score: f64, completion_rate: f64, days_inactive: u32) -> Student {
        CreateStudentRequest {
            tenant_id: None,
            first_name: "Léa".to_string(),
            last_name: "Martin".to_string(),
            class_id: None,
            signals: LearningSignals {
                average_score,
                completion_rate,
                days_inactive,
            },
        }
        .into_student(TenantId::new("lycee-hugo"))
    }

    #[test]
    fn test_engaged_student_has_no_risk() {
        let settings = AnalyticsSettings::default();
        assert_eq!(risk_score(&LearningSignals::default(), &settings), 0.0);
    }

    #[test]
    fn test_disengaged_student_has_maximum_risk() {
        let settings = AnalyticsSettings::default();
        let signals = LearningSignals {
            average_score: 0.0,
            completion_rate: 0.0,
            days_inactive: 90,
        };
        assert_eq!(risk_score(&signals, &settings), 100.0);
        assert_eq!(risk_level(100.0, &settings), RiskLevel::High);
    }

    #[test]
    fn test_weights_shape_the_score() {
        let settings = AnalyticsSettings::default();
        // score 0.5 * 0.5 + completion 0.3 * 0.5 + inactivity 0.2 * 0.5
        let signals = LearningSignals {
            average_score: 50.0,
            completion_rate: 0.5,
            days_inactive: 15,
        };
        assert_eq!(risk_score(&signals, &settings), 50.0);
        assert_eq!(risk_level(50.0, &settings), RiskLevel::Medium);
        assert_eq!(risk_level(39.9, &settings), RiskLevel::Low);
    }

    #[test]
    fn test_report_orders_by_descending_risk() {
        let settings = AnalyticsSettings::default();
        let students = vec![
            student(90.0, 0.9, 0),
            student(10.0, 0.1, 40),
            student(55.0, 0.6, 10),
        ];
        let report = risk_report(&students, &settings);

        let scores: Vec<f64> = report.students.iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(report.high + report.medium + report.low, 3);
        assert_eq!(report.high, 1);
    }

    #[test]
    fn test_teacher_report_counts_per_owner() {
        let tenant = TenantId::new("lycee-hugo");
        let new_assignment = |owner: &str| {
            CreateAssignmentRequest {
                tenant_id: None,
                title: "Devoir".to_string(),
                description: None,
                class_id: None,
                due_at: None,
            }
            .into_assignment(tenant.clone(), UserId::new(owner))
        };

        let mut published = new_assignment("u-1");
        published.status = AssignmentStatus::Published;
        published.mark_validated(UserId::new("dir-1"));
        let assignments = vec![published, new_assignment("u-1"), new_assignment("u-2")];

        let report = teacher_report(&[], &assignments);
        assert_eq!(
            report.teachers,
            vec![
                TeacherKpi {
                    teacher_id: UserId::new("u-1"),
                    classes: 0,
                    assignments: 2,
                    published: 1,
                    validated: 1,
                },
                TeacherKpi {
                    teacher_id: UserId::new("u-2"),
                    classes: 0,
                    assignments: 1,
                    published: 0,
                    validated: 0,
                },
            ]
        );
    }
}
