use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A staff position and the team whose manager approves its requests.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Position {
    #[schema(example = 3)]
    pub id: i64,

    #[schema(example = "admin")]
    pub team: String,

    #[schema(example = "CT Desk")]
    pub name: String,
}
