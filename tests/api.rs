//! HTTP 层集成测试：完整路由表 + 内存 SQLite

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::{Value, json};

use common::{TEST_PASSWORD, create_user, delete, get, post, put, setup};
use eduportal::models::users::entities::UserRole;

fn id_of(body: &Value) -> i64 {
    body["data"]["id"].as_i64().expect("response carries an id")
}

#[actix_web::test]
async fn test_health_is_public() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let (status, body) = send!(app, TestRequest::get().uri("/api/v1/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "ok");
}

#[actix_web::test]
async fn test_requests_without_token_are_rejected() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let (status, _) = send!(app, TestRequest::get().uri("/api/v1/subjects"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(app, get("/api/v1/subjects", "not-a-jwt"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // WebSocket 在升级前校验令牌
    let (status, _) = send!(app, TestRequest::get().uri("/api/v1/ws"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send!(app, TestRequest::get().uri("/api/v1/ws?token=garbage"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let ctx = setup().await;
    let app = init_app!(ctx);
    let peer = "10.20.0.1:40000".parse().expect("socket addr");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/auth/register")
            .peer_addr(peer)
            .set_json(json!({
                "username": "newpupil",
                "email": "newpupil@school.edu",
                "password": TEST_PASSWORD,
            }))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    // 自助注册只能得到学生账号
    assert_eq!(body["data"]["user"]["role"], "student");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/auth/register")
            .peer_addr(peer)
            .set_json(json!({
                "username": "newpupil",
                "email": "other@school.edu",
                "password": TEST_PASSWORD,
            }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr(peer)
            .set_json(json!({ "username": "newpupil", "password": "Wrong-pass1" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr(peer)
            .set_json(json!({ "username": "newpupil", "password": TEST_PASSWORD }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["data"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();

    let (status, body) = send!(app, get("/api/v1/auth/me", &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "newpupil");
}

#[actix_web::test]
async fn test_role_gates() {
    let ctx = setup().await;
    let (_, student) = create_user(&ctx, "pupil01", UserRole::Student).await;
    let (_, teacher) = create_user(&ctx, "teacher01", UserRole::Teacher).await;
    let (_, director) = create_user(&ctx, "director1", UserRole::Director).await;
    let app = init_app!(ctx);

    let (status, _) = send!(
        app,
        post(
            "/api/v1/subjects",
            &student,
            json!({ "code": "ART-1", "name": "Art" })
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(app, get("/api/v1/users", &teacher));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(app, get("/api/v1/users", &director));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 3);

    // 校领导只读
    let (status, _) = send!(app, delete("/api/v1/users/1", &director));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(app, get("/api/v1/users/directory", &student));
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[actix_web::test]
async fn test_assignment_submission_and_grading_flow() {
    let ctx = setup().await;
    let (_, admin) = create_user(&ctx, "admin01", UserRole::Admin).await;
    let (teacher_user, teacher) = create_user(&ctx, "teacher01", UserRole::Teacher).await;
    let (student_user, student) = create_user(&ctx, "pupil01", UserRole::Student).await;
    let (_, outsider) = create_user(&ctx, "pupil02", UserRole::Student).await;
    let app = init_app!(ctx);

    let (status, body) = send!(
        app,
        post(
            "/api/v1/subjects",
            &admin,
            json!({ "code": "MATH-101", "name": "Algebra", "teacher_id": teacher_user.id })
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let subject_id = id_of(&body);

    // 只能选学生
    let (status, _) = send!(
        app,
        post(
            &format!("/api/v1/subjects/{subject_id}/students"),
            &teacher,
            json!({ "student_id": teacher_user.id })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        post(
            &format!("/api/v1/subjects/{subject_id}/students"),
            &teacher,
            json!({ "student_id": student_user.id })
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send!(
        app,
        post(
            &format!("/api/v1/subjects/{subject_id}/students"),
            &teacher,
            json!({ "student_id": student_user.id })
        )
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        post(
            "/api/v1/assignments",
            &teacher,
            json!({ "subject_id": subject_id, "title": "Quadratics", "max_score": 50.0 })
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let assignment_id = id_of(&body);

    // 已选课学生收到通知
    let (status, body) = send!(app, get("/api/v1/notifications", &student));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["items"][0]["notification_type"], "assignment_created");

    let submit_uri = format!("/api/v1/assignments/{assignment_id}/submissions");
    let (status, body) = send!(
        app,
        post(&submit_uri, &outsider, json!({ "content": "let me in" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 3006);

    let (status, body) = send!(
        app,
        post(&submit_uri, &student, json!({ "content": "x = 2 or x = 3" }))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "submitted");
    let submission_id = id_of(&body);

    // 批改前可以重新提交
    let (status, _) = send!(
        app,
        post(&submit_uri, &student, json!({ "content": "x = 2 or x = 3 (checked)" }))
    );
    assert_eq!(status, StatusCode::OK);

    let grade_uri = format!("/api/v1/submissions/{submission_id}/grade");
    let (status, _) = send!(app, post(&grade_uri, &teacher, json!({ "score": 51.0 })));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        post(&grade_uri, &teacher, json!({ "score": 45.0, "comment": "Good" }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = send!(app, post(&grade_uri, &teacher, json!({ "score": 40.0 })));
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send!(
        app,
        post(&submit_uri, &student, json!({ "content": "one more try" }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        get(&format!("/api/v1/assignments/{assignment_id}/my-submission"), &student)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["submission"]["status"], "graded");
    assert_eq!(body["data"]["grade"]["score"], 45.0);

    let (status, body) = send!(app, get("/api/v1/grades", &student));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["score"], 45.0);
    assert_eq!(body["data"]["items"][0]["max_score"], 50.0);

    let (status, body) = send!(
        app,
        get(&format!("/api/v1/grades/report?subject_id={subject_id}"), &teacher)
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["subjects"][0]["average_percentage"], 90.0);

    let (status, _) = send!(app, get("/api/v1/grades/report", &student));
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_students_only_see_their_own_grades() {
    let ctx = setup().await;
    let (_, admin) = create_user(&ctx, "admin01", UserRole::Admin).await;
    let (alice_user, alice) = create_user(&ctx, "alice01", UserRole::Student).await;
    let (bob_user, _) = create_user(&ctx, "bobby01", UserRole::Student).await;
    let app = init_app!(ctx);

    let (_, body) = send!(
        app,
        post("/api/v1/subjects", &admin, json!({ "code": "BIO-1", "name": "Biology" }))
    );
    let subject_id = id_of(&body);
    for student_id in [alice_user.id, bob_user.id] {
        let (status, _) = send!(
            app,
            post(
                &format!("/api/v1/subjects/{subject_id}/students"),
                &admin,
                json!({ "student_id": student_id })
            )
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send!(
        app,
        post(
            "/api/v1/grades",
            &admin,
            json!({
                "student_id": bob_user.id,
                "subject_id": subject_id,
                "grade_type": "exam",
                "title": "Midterm",
                "score": 70.0,
                "max_score": 100.0
            })
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let grade_id = id_of(&body);

    let (status, _) = send!(
        app,
        get(&format!("/api/v1/grades?student_id={}", bob_user.id), &alice)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(app, get("/api/v1/grades", &alice));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let (status, _) = send!(app, get(&format!("/api/v1/grades/{grade_id}"), &alice));
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 分数不得超过满分
    let (status, _) = send!(
        app,
        put(&format!("/api/v1/grades/{grade_id}"), &admin, json!({ "score": 120.0 }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_schedule_conflicts_are_rejected() {
    let ctx = setup().await;
    let (_, admin) = create_user(&ctx, "admin01", UserRole::Admin).await;
    let (teacher_user, teacher) = create_user(&ctx, "teacher01", UserRole::Teacher).await;
    let app = init_app!(ctx);

    let mut subject_ids = Vec::new();
    for code in ["PHY-1", "CHEM-1"] {
        let (_, body) = send!(
            app,
            post(
                "/api/v1/subjects",
                &admin,
                json!({ "code": code, "name": code, "teacher_id": teacher_user.id })
            )
        );
        subject_ids.push(id_of(&body));
    }

    let (status, body) = send!(
        app,
        post(
            "/api/v1/schedule",
            &teacher,
            json!({
                "subject_id": subject_ids[0],
                "title": "Mechanics",
                "day_of_week": 1,
                "start_time": "09:00",
                "end_time": "10:30",
                "room": "Lab A"
            })
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");

    // 同一教师同一时段
    let (status, body) = send!(
        app,
        post(
            "/api/v1/schedule",
            &teacher,
            json!({
                "subject_id": subject_ids[1],
                "title": "Reactions",
                "day_of_week": 1,
                "start_time": "10:00",
                "end_time": "11:00",
                "room": "Lab B"
            })
        )
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3102);

    // 首尾相接不算冲突
    let (status, _) = send!(
        app,
        post(
            "/api/v1/schedule",
            &teacher,
            json!({
                "subject_id": subject_ids[1],
                "title": "Reactions",
                "day_of_week": 1,
                "start_time": "10:30",
                "end_time": "11:30",
                "room": "lab a"
            })
        )
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send!(
        app,
        post(
            "/api/v1/schedule",
            &teacher,
            json!({
                "subject_id": subject_ids[1],
                "title": "Backwards",
                "day_of_week": 8,
                "start_time": "12:00",
                "end_time": "11:00"
            })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(app, get("/api/v1/schedule?day_of_week=1", &teacher));
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["start_time"], "09:00");
}

#[actix_web::test]
async fn test_message_relay_over_rest() {
    let ctx = setup().await;
    let (alice_user, alice) = create_user(&ctx, "alice01", UserRole::Student).await;
    let (bob_user, bob) = create_user(&ctx, "bobby01", UserRole::Teacher).await;
    let app = init_app!(ctx);

    let (status, body) = send!(
        app,
        post(
            "/api/v1/messages",
            &alice,
            json!({ "recipient_id": alice_user.id, "content": "note to self" })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6000);

    for content in ["hello", "are you there?"] {
        let (status, body) = send!(
            app,
            post(
                "/api/v1/messages",
                &alice,
                json!({ "recipient_id": bob_user.id, "content": content })
            )
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        // 对方离线，保持 sent
        assert_eq!(body["data"]["status"], "sent");
    }

    let (_, body) = send!(app, get("/api/v1/messages/unread-count", &bob));
    assert_eq!(body["data"]["unread_count"], 2);

    let (status, body) = send!(
        app,
        get(&format!("/api/v1/messages/conversations/{}", alice_user.id), &bob)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["messages"][0]["content"], "hello");
    assert_eq!(body["data"]["messages"][1]["content"], "are you there?");

    let (status, body) = send!(
        app,
        post(
            &format!("/api/v1/messages/conversations/{}/read", alice_user.id),
            &bob,
            json!({})
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["marked_count"], 2);

    let (_, body) = send!(app, get("/api/v1/messages/conversations", &alice));
    assert_eq!(body["data"]["items"][0]["partner"]["id"], bob_user.id);
    assert_eq!(body["data"]["items"][0]["last_message"]["status"], "read");
}

#[actix_web::test]
async fn test_admin_request_can_only_be_reviewed_once() {
    let ctx = setup().await;
    let (_, admin) = create_user(&ctx, "admin01", UserRole::Admin).await;
    let (_, student) = create_user(&ctx, "pupil01", UserRole::Student).await;
    let app = init_app!(ctx);

    let (status, _) = send!(
        app,
        post(
            "/api/v1/requests",
            &admin,
            json!({ "request_type": "leave", "title": "Holiday" })
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        post(
            "/api/v1/requests",
            &student,
            json!({ "request_type": "certificate", "title": "Enrollment certificate" })
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let request_id = id_of(&body);

    let review_uri = format!("/api/v1/requests/{request_id}/review");
    let (status, _) = send!(app, post(&review_uri, &student, json!({ "status": "approved" })));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        post(&review_uri, &admin, json!({ "status": "approved", "comment": "Ready Friday" }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "approved");

    let (status, _) = send!(app, post(&review_uri, &admin, json!({ "status": "rejected" })));
    assert_eq!(status, StatusCode::CONFLICT);

    // 已审批的申请不能撤回
    let (status, _) = send!(app, delete(&format!("/api/v1/requests/{request_id}"), &student));
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send!(app, get("/api/v1/notifications/unread-count", &student));
    assert_eq!(body["data"]["unread_count"], 1);
}

#[actix_web::test]
async fn test_task_assignee_may_only_change_status() {
    let ctx = setup().await;
    let (_, teacher) = create_user(&ctx, "teacher01", UserRole::Teacher).await;
    let (student_user, student) = create_user(&ctx, "pupil01", UserRole::Student).await;
    let (_, other) = create_user(&ctx, "pupil02", UserRole::Student).await;
    let app = init_app!(ctx);

    // 学生不能给别人派任务
    let (status, _) = send!(
        app,
        post(
            "/api/v1/tasks",
            &student,
            json!({ "title": "Do my homework", "assignee_id": 1 })
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        post(
            "/api/v1/tasks",
            &teacher,
            json!({ "title": "Return library books", "assignee_id": student_user.id, "priority": "high" })
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "todo");
    let task_uri = format!("/api/v1/tasks/{}", id_of(&body));

    let (status, _) = send!(app, get(&task_uri, &other));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(app, put(&task_uri, &student, json!({ "title": "Skip it" })));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(app, put(&task_uri, &student, json!({ "status": "done" })));
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["completed_at"].is_string());

    let (status, body) = send!(app, put(&task_uri, &teacher, json!({ "status": "in_progress" })));
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["completed_at"].is_null());

    let (_, body) = send!(app, get("/api/v1/tasks?scope=assigned", &student));
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, _) = send!(app, delete(&task_uri, &student));
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send!(app, delete(&task_uri, &teacher));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_curriculum_plan_review_cycle() {
    let ctx = setup().await;
    let (_, admin) = create_user(&ctx, "admin01", UserRole::Admin).await;
    let (teacher_user, teacher) = create_user(&ctx, "teacher01", UserRole::Teacher).await;
    let (student_user, student) = create_user(&ctx, "pupil01", UserRole::Student).await;
    let app = init_app!(ctx);

    let (_, body) = send!(
        app,
        post(
            "/api/v1/subjects",
            &admin,
            json!({ "code": "HIST-2", "name": "History", "teacher_id": teacher_user.id })
        )
    );
    let subject_id = id_of(&body);
    send!(
        app,
        post(
            &format!("/api/v1/subjects/{subject_id}/students"),
            &teacher,
            json!({ "student_id": student_user.id })
        )
    );

    let (status, _) = send!(
        app,
        post(
            "/api/v1/curriculum",
            &teacher,
            json!({ "subject_id": subject_id, "title": "Term plan", "academic_year": "2025-2027", "term": 1 })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        post(
            "/api/v1/curriculum",
            &teacher,
            json!({
                "subject_id": subject_id,
                "title": "Term plan",
                "academic_year": "2025-2026",
                "term": 1,
                "topics": [{ "week": 1, "topic": "Ancient Egypt" }]
            })
        )
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "draft");
    let plan_id = id_of(&body);

    // 草稿对学生不可见
    let (status, _) = send!(app, get(&format!("/api/v1/curriculum/{plan_id}"), &student));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let review_uri = format!("/api/v1/curriculum/{plan_id}/review");
    let (status, _) = send!(app, post(&review_uri, &admin, json!({ "approve": true })));
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        post(&format!("/api/v1/curriculum/{plan_id}/submit"), &teacher, json!({}))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "submitted");

    let (status, body) = send!(
        app,
        post(&review_uri, &admin, json!({ "approve": true, "comment": "Looks good" }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "approved");

    let (status, body) = send!(app, get("/api/v1/curriculum", &student));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (_, body) = send!(app, get("/api/v1/notifications", &teacher));
    assert_eq!(body["data"]["items"][0]["notification_type"], "curriculum_reviewed");
}

#[actix_web::test]
async fn test_admin_settings_are_validated_and_audited() {
    let ctx = setup().await;
    let (_, admin) = create_user(&ctx, "admin01", UserRole::Admin).await;
    let (_, teacher) = create_user(&ctx, "teacher01", UserRole::Teacher).await;
    let app = init_app!(ctx);

    let (status, _) = send!(app, get("/api/v1/system/settings", &teacher));
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send!(app, get("/api/v1/system/admin/settings", &teacher));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        put(
            "/api/v1/system/admin/settings/messages.max_length",
            &admin,
            json!({ "value": "lots" })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8001);

    let (status, _) = send!(
        app,
        put(
            "/api/v1/system/admin/settings/does.not_exist",
            &admin,
            json!({ "value": "1" })
        )
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        put(
            "/api/v1/system/admin/settings/app.system_name",
            &admin,
            json!({ "value": "Riverside High" })
        )
    );
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send!(
        app,
        get("/api/v1/system/admin/settings/audits?key=app.system_name", &admin)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["audits"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["audits"][0]["new_value"], "Riverside High");

    let (status, body) = send!(app, get("/api/v1/system/admin/websocket", &admin));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["online_users"], 0);
}
