//! PostgreSQL-backed `UserRecordRepository` implementation using Diesel ORM.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRecordRepository, UserRecordRepositoryError};
use crate::domain::{OrganizationRecord, QuotaInBytes, UserId, UserRecord, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{OrganizationRow, UserRoleUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{organizations, users};

/// Diesel-backed implementation of the `UserRecordRepository` port.
///
/// Loads users with their organization in a single left join. Saves write
/// only the role columns after the record rules pass.
#[derive(Clone)]
pub struct DieselUserRecordRepository {
    pool: DbPool,
}

impl DieselUserRecordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserRecordRepositoryError {
    map_pool_error(error, |message| UserRecordRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> UserRecordRepositoryError {
    map_diesel_error(
        error,
        |message| UserRecordRepositoryError::query(message),
        |message| UserRecordRepositoryError::connection(message),
    )
}

fn row_to_record(
    row: UserRow,
    organization: Option<OrganizationRow>,
) -> Result<UserRecord, UserRecordRepositoryError> {
    let username = Username::new(row.username).map_err(|err| {
        UserRecordRepositoryError::query(format!("stored user {} is invalid: {err}", row.id))
    })?;

    Ok(UserRecord {
        id: UserId::from_uuid(row.id),
        username,
        email: row.email,
        organization: organization.map(|org| OrganizationRecord {
            id: org.id,
            name: org.name,
            default_quota_in_bytes: QuotaInBytes::new(org.default_quota_in_bytes),
        }),
        feature_flags: row.feature_flags.into_iter().collect::<BTreeSet<_>>(),
        quota_in_bytes: QuotaInBytes::new(row.quota_in_bytes),
        viewer: row.viewer,
        dashboard_viewed_at: row.dashboard_viewed_at,
        google_sign_in: row.google_sign_in,
        last_password_change_date: row.last_password_change_date,
    })
}

/// Apply the role invariants and validate; returns the changeset to write.
fn prepare_update(record: &UserRecord) -> Result<UserRoleUpdate, UserRecordRepositoryError> {
    let mut normalised = record.clone();
    normalised.apply_role_invariants();
    normalised
        .validate()
        .map_err(|errors| UserRecordRepositoryError::Validation { errors })?;

    Ok(UserRoleUpdate {
        viewer: normalised.viewer,
        quota_in_bytes: normalised.quota_in_bytes.get(),
    })
}

/// A save that touched no rows means the user was deleted after loading.
fn ensure_updated(updated_rows: usize, id: &UserId) -> Result<(), UserRecordRepositoryError> {
    if updated_rows == 0 {
        return Err(UserRecordRepositoryError::not_found(id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl UserRecordRepository for DieselUserRecordRepository {
    async fn find_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<UserRecord>, UserRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<(UserRow, Option<OrganizationRow>)> = users::table
            .left_join(organizations::table)
            .filter(users::id.eq(id.as_uuid()))
            .select((UserRow::as_select(), Option::<OrganizationRow>::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|(user, organization)| row_to_record(user, organization))
            .transpose()
    }

    async fn save(&self, record: &UserRecord) -> Result<(), UserRecordRepositoryError> {
        let update = prepare_update(record)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let updated_rows = diesel::update(users::table.filter(users::id.eq(record.id.as_uuid())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        ensure_updated(updated_rows, &record.id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn user_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            organization_id: None,
            feature_flags: vec!["b".to_owned(), "a".to_owned(), "a".to_owned()],
            quota_in_bytes: 500,
            viewer: false,
            dashboard_viewed_at: None,
            google_sign_in: true,
            last_password_change_date: None,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = pool_error(PoolError::checkout("connection to 10.0.0.5 refused"));

        assert_eq!(
            repo_err,
            UserRecordRepositoryError::connection("database pool unavailable")
        );
    }

    #[rstest]
    #[case(1, true)]
    #[case(0, false)]
    fn save_requires_a_matching_row(#[case] updated_rows: usize, #[case] saved: bool) {
        let id = UserId::random();

        let outcome = ensure_updated(updated_rows, &id);

        if saved {
            assert_eq!(outcome, Ok(()));
        } else {
            assert_eq!(
                outcome,
                Err(UserRecordRepositoryError::not_found(id.to_string()))
            );
        }
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = diesel_error(diesel::result::Error::NotFound);

        assert_eq!(repo_err, UserRecordRepositoryError::query("record not found"));
    }

    #[rstest]
    fn row_converts_with_organization(mut user_row: UserRow) {
        let org_id = Uuid::new_v4();
        user_row.organization_id = Some(org_id);
        let organization = OrganizationRow {
            id: org_id,
            name: "acme".to_owned(),
            default_quota_in_bytes: 1000,
        };

        let record = row_to_record(user_row, Some(organization)).expect("valid row");

        assert!(!record.can_change_email());
        let org = record.organization.expect("organization joined");
        assert_eq!(org.name, "acme");
        assert_eq!(org.default_quota_in_bytes, QuotaInBytes::new(1000));
        assert_eq!(
            record.feature_flags.into_iter().collect::<Vec<_>>(),
            vec!["a".to_owned(), "b".to_owned()]
        );
    }

    #[rstest]
    fn row_with_invalid_username_is_a_query_error(mut user_row: UserRow) {
        user_row.username = "Not Valid".to_owned();

        let error = row_to_record(user_row, None).expect_err("invalid username");
        assert!(matches!(error, UserRecordRepositoryError::Query { .. }));
    }

    #[rstest]
    fn prepare_update_zeroes_viewer_quota(user_row: UserRow) {
        let mut record = row_to_record(user_row, None).expect("valid row");
        record.viewer = true;

        let update = prepare_update(&record).expect("valid viewer");
        assert!(update.viewer);
        assert_eq!(update.quota_in_bytes, 0);
    }

    #[rstest]
    fn prepare_update_rejects_negative_quota(user_row: UserRow) {
        let mut record = row_to_record(user_row, None).expect("valid row");
        record.quota_in_bytes = QuotaInBytes::new(-10);

        let error = prepare_update(&record).expect_err("negative quota");
        assert!(matches!(error, UserRecordRepositoryError::Validation { .. }));
    }
}
