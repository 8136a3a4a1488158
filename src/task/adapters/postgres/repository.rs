//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::config::DatabaseConfig;
use crate::task::{
    domain::{
        DeletionFilter, KeywordMatch, PersistedTaskData, SortDirection, SortField, Task,
        TaskDescription, TaskId, TaskPage, TaskPriority, TaskQuery, TaskScope, TaskStatus,
        TaskTitle, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

type BoxedTaskQuery = tasks::BoxedQuery<'static, Pg>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from configuration and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when no database URL is
    /// configured or the pool cannot be established.
    pub fn connect(config: &DatabaseConfig) -> TaskRepositoryResult<Self> {
        let url = config.require_url().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                err.to_string(),
            ))
        })?;
        let manager = ConnectionManager::<PgConnection>::new(url);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)
            .map_err(TaskRepositoryError::persistence)?;
        tracing::debug!(max_connections = config.max_connections, "task database pool ready");
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);
        self.run_blocking(move |connection| update_row(connection, task_id, &changeset))
            .await
    }

    async fn update_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let batch: Vec<(TaskId, TaskChangeset)> = tasks
            .iter()
            .map(|task| (task.id(), to_changeset(task)))
            .collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|transaction| {
                for (task_id, changeset) in &batch {
                    update_row(transaction, *task_id, changeset)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.find_scoped(id, TaskScope::Unscoped).await
    }

    async fn find_scoped(
        &self,
        id: TaskId,
        scope: TaskScope,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = scoped(tasks::table.into_boxed(), scope)
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn query(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let owned = query.clone();
        self.run_blocking(move |connection| {
            let total = filtered(&owned).count().get_result::<i64>(connection)?;
            let total_items = u64::try_from(total).map_err(TaskRepositoryError::persistence)?;

            let rows = windowed(&owned)?
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            let items = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;

            let (page, size) = match owned.pagination {
                Some(pagination) => (pagination.page, pagination.size),
                None => (0, u32::try_from(items.len()).unwrap_or(u32::MAX)),
            };
            Ok(TaskPage::new(items, page, size, total_items))
        })
        .await
    }

    async fn count(&self, query: &TaskQuery) -> TaskRepositoryResult<u64> {
        let owned = query.clone();
        self.run_blocking(move |connection| {
            let total = filtered(&owned).count().get_result::<i64>(connection)?;
            u64::try_from(total).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            if removed == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_all(&self, scope: TaskScope) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let removed = match scope {
                TaskScope::Unscoped => diesel::delete(tasks::table).execute(connection)?,
                TaskScope::Owner(owner) => {
                    diesel::delete(tasks::table.filter(tasks::owner_id.eq(owner.into_inner())))
                        .execute(connection)?
                }
            };
            u64::try_from(removed).map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn update_row(
    connection: &mut PgConnection,
    task_id: TaskId,
    changeset: &TaskChangeset,
) -> TaskRepositoryResult<()> {
    let affected = diesel::update(tasks::table.find(task_id.into_inner()))
        .set(changeset)
        .execute(connection)?;
    if affected == 0 {
        return Err(TaskRepositoryError::NotFound(task_id));
    }
    Ok(())
}

fn scoped(statement: BoxedTaskQuery, scope: TaskScope) -> BoxedTaskQuery {
    match scope {
        TaskScope::Unscoped => statement,
        TaskScope::Owner(owner) => statement.filter(tasks::owner_id.eq(owner.into_inner())),
    }
}

/// Applies every predicate of the query, without ordering or window.
fn filtered(query: &TaskQuery) -> BoxedTaskQuery {
    let mut statement = scoped(tasks::table.into_boxed(), query.scope);

    statement = match query.deletion {
        DeletionFilter::Active => statement.filter(tasks::deleted_at.is_null()),
        DeletionFilter::Deleted => statement.filter(tasks::deleted_at.is_not_null()),
    };

    let filter = &query.filter;
    if let Some(status) = filter.status {
        statement = statement.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        statement = statement.filter(tasks::priority.eq(priority.as_str()));
    }
    if let Some(archived) = filter.archived {
        statement = statement.filter(tasks::archived.eq(archived));
    }
    if let Some(keyword) = filter.keyword.as_deref() {
        let pattern = like_pattern(keyword);
        statement = match filter.keyword_match {
            KeywordMatch::Title => statement.filter(tasks::title.ilike(pattern)),
            KeywordMatch::TitleOrDescription => statement.filter(
                tasks::title
                    .ilike(pattern.clone())
                    .or(tasks::description.ilike(pattern)),
            ),
        };
    }
    if let Some(now) = query.overdue_at {
        statement = statement
            .filter(tasks::status.ne(TaskStatus::Completed.as_str()))
            .filter(tasks::due_date.lt(now));
    }

    statement
}

/// Applies predicates, ordering and the page window.
fn windowed(query: &TaskQuery) -> TaskRepositoryResult<BoxedTaskQuery> {
    let statement = ordered(filtered(query), query);
    let Some(pagination) = query.pagination else {
        return Ok(statement);
    };
    let offset = i64::try_from(pagination.offset()).map_err(TaskRepositoryError::persistence)?;
    Ok(statement
        .limit(i64::from(pagination.size))
        .offset(offset))
}

fn ordered(base: BoxedTaskQuery, query: &TaskQuery) -> BoxedTaskQuery {
    let sort = query.sort;
    let primary = match (sort.field, sort.direction) {
        (SortField::Id, SortDirection::Ascending) => base.order_by(tasks::id.asc()),
        (SortField::Id, SortDirection::Descending) => base.order_by(tasks::id.desc()),
        (SortField::Title, SortDirection::Ascending) => base.order_by(tasks::title.asc()),
        (SortField::Title, SortDirection::Descending) => base.order_by(tasks::title.desc()),
        (SortField::Status, SortDirection::Ascending) => base.order_by(tasks::status.asc()),
        (SortField::Status, SortDirection::Descending) => base.order_by(tasks::status.desc()),
        (SortField::Priority, SortDirection::Ascending) => base.order_by(tasks::priority.asc()),
        (SortField::Priority, SortDirection::Descending) => base.order_by(tasks::priority.desc()),
        (SortField::DueDate, SortDirection::Ascending) => base.order_by(tasks::due_date.asc()),
        (SortField::DueDate, SortDirection::Descending) => base.order_by(tasks::due_date.desc()),
        (SortField::CreatedAt, SortDirection::Ascending) => base.order_by(tasks::created_at.asc()),
        (SortField::CreatedAt, SortDirection::Descending) => {
            base.order_by(tasks::created_at.desc())
        }
        (SortField::UpdatedAt, SortDirection::Ascending) => base.order_by(tasks::updated_at.asc()),
        (SortField::UpdatedAt, SortDirection::Descending) => {
            base.order_by(tasks::updated_at.desc())
        }
    };
    primary.then_order_by(tasks::id.asc())
}

/// Wraps a keyword in `%` wildcards, escaping `LIKE` metacharacters so the
/// keyword matches literally.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().map(UserId::into_inner),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|text| text.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        archived: task.is_archived(),
        deleted_at: task.deleted_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(|text| text.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        archived: task.is_archived(),
        deleted_at: task.deleted_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title: persisted_title,
        description: persisted_description,
        status: persisted_status,
        priority: persisted_priority,
        due_date,
        archived,
        deleted_at,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let description = persisted_description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: owner_id.map(UserId::from_uuid),
        title,
        description,
        status,
        priority,
        due_date,
        archived,
        deleted_at,
        created_at,
        updated_at,
    }))
}
