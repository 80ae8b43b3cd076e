use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use orchestrator_core::identity::Role;
use orchestrator_core::school::assignment::{
    Assignment, AssignmentStatus, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use orchestrator_core::school::class::{Class, CreateClassRequest};
use orchestrator_core::school::student::{CreateStudentRequest, LearningSignals, Student};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::SecurityScheme;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::error::ErrorBody;
use crate::api::handlers::analytics::{
    __path_risk_report_handler, __path_teacher_report_handler, risk_report_handler,
    teacher_report_handler,
};
use crate::api::handlers::assignments::{
    __path_create_assignment_handler, __path_delete_assignment_handler,
    __path_list_assignments_handler, __path_update_assignment_handler,
    __path_validate_assignment_handler, create_assignment_handler, delete_assignment_handler,
    list_assignments_handler, update_assignment_handler, validate_assignment_handler,
    AssignmentList,
};
use crate::api::handlers::classes::{
    __path_create_class_handler, __path_list_classes_handler, create_class_handler,
    list_classes_handler, ClassList,
};
use crate::api::handlers::health::{__path_health_checker_handler, health_checker_handler};
use crate::api::handlers::students::{
    __path_create_student_handler, __path_list_students_handler, create_student_handler,
    list_students_handler, StudentList,
};
use crate::api::middleware::tenant_guard::tenant_guard;
use crate::app_state::SharedAppState;
use crate::services::analytics::{RiskLevel, RiskReport, StudentRisk, TeacherKpi, TeacherReport};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,
        list_students_handler,
        create_student_handler,
        list_classes_handler,
        create_class_handler,
        list_assignments_handler,
        create_assignment_handler,
        update_assignment_handler,
        delete_assignment_handler,
        validate_assignment_handler,
        risk_report_handler,
        teacher_report_handler,
    ),
    components(
        schemas(
            Student, StudentList, CreateStudentRequest, LearningSignals,
            Class, ClassList, CreateClassRequest,
            Assignment, AssignmentList, AssignmentStatus, CreateAssignmentRequest,
            UpdateAssignmentRequest, RiskLevel, RiskReport, StudentRisk, TeacherKpi,
            TeacherReport, ErrorBody, Role
        )
    ),
    tags(
        (name = "orchestrator", description = "multi-tenant school administration api")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        )
    }
}

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        let api = ApiDoc::openapi();

        // Every route here runs behind the tenant guard.
        let tenant_router = Router::new()
            .route(
                "/api/v1/students",
                get(list_students_handler).post(create_student_handler),
            )
            .route(
                "/api/v1/classes",
                get(list_classes_handler).post(create_class_handler),
            )
            .route(
                "/api/v1/assignments",
                get(list_assignments_handler).post(create_assignment_handler),
            )
            .route(
                "/api/v1/assignments/{id}",
                patch(update_assignment_handler).delete(delete_assignment_handler),
            )
            .route(
                "/api/v1/assignments/{id}/validate",
                post(validate_assignment_handler),
            )
            .route("/api/v1/analytics/risk", get(risk_report_handler))
            .route("/api/v1/analytics/teachers", get(teacher_report_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), tenant_guard));

        let public_router = Router::new()
            .route("/api/v1/health", get(health_checker_handler))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api));

        Router::new()
            .merge(tenant_router)
            .merge(public_router)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
