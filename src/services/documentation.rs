use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Golf Brain Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::rounds::active_round,
        crate::routes::rounds::start_round,
        crate::routes::rounds::get_round,
        crate::routes::rounds::delete_round,
        crate::routes::rounds::hole_view,
        crate::routes::rounds::commit_hole,
        crate::routes::rounds::add_stroke,
        crate::routes::rounds::go_to_hole,
        crate::routes::rounds::toggle_mental,
        crate::routes::rounds::set_club,
        crate::routes::rounds::delete_stroke,
        crate::routes::rounds::complete_round,
        crate::routes::stats::summary,
        crate::routes::stats::dashboard,
        crate::routes::stats::history,
        crate::routes::stats::export_csv,
        crate::routes::account::list_bag,
        crate::routes::account::add_club,
        crate::routes::account::reorder_bag,
        crate::routes::account::set_bsm,
        crate::routes::account::delete_club,
        crate::routes::account::list_mental_elements,
        crate::routes::account::add_mental_element,
        crate::routes::account::reorder_mental_elements,
        crate::routes::account::delete_mental_element,
        crate::routes::account::get_home_club,
        crate::routes::account::save_home_club,
        crate::routes::account::list_courses,
        crate::routes::account::create_course,
        crate::routes::account::get_course,
        crate::routes::account::delete_course,
        crate::routes::account::set_default_course,
        crate::routes::intake::contact,
        crate::routes::intake::interest,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::domain::stroke::StrokeType,
            crate::domain::round::RoundStatus,
            crate::dto::round::RoundSummary,
            crate::dto::round::ActiveRoundResponse,
            crate::dto::round::StartRoundRequest,
            crate::dto::round::StrokeView,
            crate::dto::round::HoleView,
            crate::dto::round::AddStrokeRequest,
            crate::dto::round::GoToHoleRequest,
            crate::dto::round::SetClubRequest,
            crate::domain::stats::Trend,
            crate::domain::stats::SummaryTrend,
            crate::domain::stats::TrendComparison,
            crate::domain::stats::StrokeTypeBreakdown,
            crate::domain::stats::CalloutKind,
            crate::domain::stats::LateRoundCallout,
            crate::dto::stats::SummaryRound,
            crate::dto::stats::SummaryResponse,
            crate::dto::stats::LatestRoundStats,
            crate::dto::stats::DashboardResponse,
            crate::dto::stats::HistoryRange,
            crate::dto::stats::HistoryRound,
            crate::dto::stats::HistoryResponse,
            crate::dto::account::BagClubView,
            crate::dto::account::CreateBagClubRequest,
            crate::dto::account::SetBsmRequest,
            crate::dto::account::MentalElementView,
            crate::dto::account::CreateMentalElementRequest,
            crate::dto::account::ReorderRequest,
            crate::dto::account::HomeClubView,
            crate::dto::account::SaveHomeClubRequest,
            crate::dto::account::CourseView,
            crate::dto::account::CourseDetail,
            crate::dto::account::CreateCourseRequest,
            crate::dto::intake::ContactRequest,
            crate::dto::intake::InterestRequest,
            crate::dto::intake::OkResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rounds", description = "Round capture: holes, strokes and completion"),
        (name = "stats", description = "Focus statistics and CSV export"),
        (name = "account", description = "Bag, mental elements, home club and courses"),
        (name = "intake", description = "Public contact and interest forms"),
    )
)]
pub struct ApiDoc;
