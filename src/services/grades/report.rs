use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::GradeService;
use crate::models::{
    ApiResponse,
    grades::{
        entities::Grade,
        requests::GradeReportParams,
        responses::{GradeReportResponse, SubjectGradeSummary},
    },
};
use crate::services::permissions::{
    current_user, forbidden, internal_error, managed_subject_ids,
};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 按课程汇总成绩，结果按课程 ID 升序
pub fn summarize(grades: &[Grade], subject_names: &HashMap<i64, String>) -> Vec<SubjectGradeSummary> {
    let mut by_subject: BTreeMap<i64, Vec<&Grade>> = BTreeMap::new();
    for grade in grades {
        by_subject.entry(grade.subject_id).or_default().push(grade);
    }

    by_subject
        .into_iter()
        .map(|(subject_id, grades)| {
            let percentages: Vec<f64> = grades.iter().map(|g| g.percentage()).collect();
            let students: HashSet<i64> = grades.iter().map(|g| g.student_id).collect();
            let total: f64 = percentages.iter().sum();
            let min = percentages.iter().copied().fold(f64::INFINITY, f64::min);
            let max = percentages.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            SubjectGradeSummary {
                subject_id,
                subject_name: subject_names.get(&subject_id).cloned().unwrap_or_default(),
                grade_count: grades.len() as i64,
                student_count: students.len() as i64,
                average_percentage: round2(total / percentages.len() as f64),
                min_percentage: round2(min),
                max_percentage: round2(max),
            }
        })
        .collect()
}

/// 成绩统计，仅教职工可用
pub async fn grade_report(
    service: &GradeService,
    params: GradeReportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !user.role.is_staff() {
        return Ok(forbidden("Only staff can view grade reports"));
    }
    let storage = service.get_storage(request);

    let managed = match managed_subject_ids(&storage, &user).await {
        Ok(managed) => managed,
        Err(resp) => return Ok(resp),
    };
    let subject_ids = match (managed, params.subject_id) {
        (None, None) => None,
        (None, Some(id)) => Some(vec![id]),
        (Some(ids), None) => Some(ids),
        (Some(ids), Some(id)) => Some(ids.into_iter().filter(|v| *v == id).collect()),
    };

    let grades = match storage.list_grades_for_report(subject_ids).await {
        Ok(grades) => grades,
        Err(e) => return Ok(internal_error("Failed to load grades", e)),
    };

    let mut ids: Vec<i64> = grades.iter().map(|g| g.subject_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let names: HashMap<i64, String> = match storage.get_subjects_by_ids(&ids).await {
        Ok(subjects) => subjects.into_iter().map(|s| (s.id, s.name)).collect(),
        Err(e) => return Ok(internal_error("Failed to load subjects", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeReportResponse {
            subjects: summarize(&grades, &names),
        },
        "获取成绩统计成功",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::entities::GradeType;

    fn grade(subject_id: i64, student_id: i64, score: f64, max_score: f64) -> Grade {
        let now = chrono::Utc::now();
        Grade {
            id: 0,
            student_id,
            subject_id,
            assignment_id: None,
            submission_id: None,
            graded_by: Some(1),
            grade_type: GradeType::Exam,
            title: "Midterm".to_string(),
            score,
            max_score,
            comment: None,
            graded_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summarize_per_subject() {
        let grades = vec![
            grade(2, 10, 45.0, 50.0),
            grade(1, 10, 2.0, 3.0),
            grade(1, 11, 100.0, 100.0),
            grade(1, 10, 0.0, 10.0),
        ];
        let names = HashMap::from([(1, "Algebra".to_string())]);

        let summary = summarize(&grades, &names);
        assert_eq!(summary.len(), 2);

        let algebra = &summary[0];
        assert_eq!(algebra.subject_id, 1);
        assert_eq!(algebra.subject_name, "Algebra");
        assert_eq!(algebra.grade_count, 3);
        assert_eq!(algebra.student_count, 2);
        // (66.666.. + 100 + 0) / 3
        assert_eq!(algebra.average_percentage, 55.56);
        assert_eq!(algebra.min_percentage, 0.0);
        assert_eq!(algebra.max_percentage, 100.0);

        assert_eq!(summary[1].subject_name, "");
        assert_eq!(summary[1].average_percentage, 90.0);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[], &HashMap::new()).is_empty());
    }
}
