//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with ownership, archive and soft-delete state.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning user, null for single-tenant tasks.
        owner_id -> Nullable<Uuid>,
        /// Non-blank task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        #[max_length = 1000]
        description -> Nullable<Varchar>,
        /// Task status in storage spelling.
        #[max_length = 20]
        status -> Varchar,
        /// Task priority in storage spelling.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Archive flag.
        archived -> Bool,
        /// Soft-delete timestamp.
        deleted_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
