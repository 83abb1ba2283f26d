use super::TicketStore;
use crate::core::{
    Category, GroupCount, NewTicket, Priority, RECENT_WINDOW_DAYS, Status, Ticket, TicketFilter,
    TicketId, TicketStats, UnknownLabel,
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, FromRow, QueryBuilder, Row, Sqlite};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS tickets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        titre TEXT NOT NULL,
        description TEXT NOT NULL,
        categorie TEXT NOT NULL,
        priorite TEXT NOT NULL,
        statut TEXT NOT NULL DEFAULT 'Ouvert',
        note TEXT,
        date_creation TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
";

const SELECT_TICKET: &str = r"
    SELECT id, titre, description, categorie, priorite, statut, note, date_creation
    FROM tickets
";

/// Single-table SQLite ticket store
///
/// Holds only the connection settings. Each operation opens its own
/// connection and closes it before returning, so nothing is pooled or
/// shared between requests and concurrent writers are serialized by SQLite's
/// own locking.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl SqliteStore {
    /// Create a store backed by the database file at `path`
    ///
    /// The file is created on first connection if it does not exist.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        Self { path, options }
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `tickets` table if it is missing
    pub async fn init_schema(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(SCHEMA).execute(&mut conn).await.map(|_| ());
        release(conn, result).await
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }
}

/// Close the connection, then hand back the operation's outcome
async fn release<T>(conn: SqliteConnection, result: sqlx::Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            conn.close().await?;
            Ok(value)
        },
        Err(e) => {
            if let Err(close_err) = conn.close().await {
                tracing::warn!(error = %close_err, "Failed to close SQLite connection");
            }
            Err(e.into())
        },
    }
}

#[async_trait]
impl TicketStore for SqliteStore {
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_TICKET);
        query.push(" WHERE 1=1");

        if let Some(statut) = &filter.statut {
            query.push(" AND statut = ").push_bind(statut.clone());
        }
        if let Some(priorite) = &filter.priorite {
            query.push(" AND priorite = ").push_bind(priorite.clone());
        }
        if let Some(categorie) = &filter.categorie {
            query.push(" AND categorie = ").push_bind(categorie.clone());
        }
        if let Some(search) = &filter.search {
            // instr() is case-sensitive and takes % and _ literally, unlike LIKE
            query
                .push(" AND (instr(titre, ")
                .push_bind(search.clone())
                .push(") > 0 OR instr(description, ")
                .push_bind(search.clone())
                .push(") > 0)");
        }
        query.push(" ORDER BY id DESC");

        let mut conn = self.connect().await?;
        let result = query.build().fetch_all(&mut conn).await;
        let rows = release(conn, result).await?;
        decode_listed(&rows)
    }

    async fn get(&self, id: TicketId) -> Result<Option<Ticket>> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, Ticket>(&format!("{SELECT_TICKET} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut conn)
            .await;
        release(conn, result).await
    }

    async fn insert(&self, ticket: NewTicket) -> Result<Ticket> {
        let mut conn = self.connect().await?;
        let result = async {
            let inserted = sqlx::query(
                r"
                INSERT INTO tickets (titre, description, priorite, statut, categorie, note)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(ticket.titre.as_str())
            .bind(ticket.description.as_str())
            .bind(ticket.priorite.as_str())
            .bind(Status::Ouvert.as_str())
            .bind(ticket.categorie.as_str())
            .bind(ticket.note.as_str())
            .execute(&mut conn)
            .await?;

            let ticket = sqlx::query_as::<_, Ticket>(&format!("{SELECT_TICKET} WHERE id = ?"))
                .bind(inserted.last_insert_rowid())
                .fetch_one(&mut conn)
                .await?;
            Ok::<_, sqlx::Error>(ticket)
        }
        .await;
        release(conn, result).await
    }

    async fn update_status(&self, id: TicketId, status: Status) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("UPDATE tickets SET statut = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut conn)
            .await
            .map(|done| done.rows_affected() > 0);
        release(conn, result).await
    }

    async fn update_note(&self, id: TicketId, note: &str) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("UPDATE tickets SET note = ? WHERE id = ?")
            .bind(note)
            .bind(id)
            .execute(&mut conn)
            .await
            .map(|done| done.rows_affected() > 0);
        release(conn, result).await
    }

    async fn delete(&self, id: TicketId) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await
            .map(|done| done.rows_affected() > 0);
        release(conn, result).await
    }

    async fn aggregate_counts(&self) -> Result<TicketStats> {
        let mut conn = self.connect().await?;
        let result = async {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
                .fetch_one(&mut conn)
                .await?;

            let recents: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM tickets WHERE date_creation >= datetime('now', ?)",
            )
            .bind(format!("-{RECENT_WINDOW_DAYS} days"))
            .fetch_one(&mut conn)
            .await?;

            let repartition_statut = group_counts(&mut conn, "statut").await?;
            let repartition_priorite = group_counts(&mut conn, "priorite").await?;
            let repartition_categorie = group_counts(&mut conn, "categorie").await?;

            let status_count = |status: Status| {
                repartition_statut
                    .iter()
                    .find(|group| group.label == status.as_str())
                    .map_or(0, |group| group.count)
            };

            Ok::<_, sqlx::Error>(TicketStats {
                total,
                ouverts: status_count(Status::Ouvert),
                en_cours: status_count(Status::EnCours),
                resolus: status_count(Status::Resolu),
                fermes: status_count(Status::Ferme),
                recents,
                repartition_statut,
                repartition_priorite,
                repartition_categorie,
            })
        }
        .await;
        release(conn, result).await
    }
}

/// Decode listed rows, skipping rows whose labels were written around
/// validation so that one stray row does not hide the rest
fn decode_listed(rows: &[SqliteRow]) -> Result<Vec<Ticket>> {
    let mut tickets = Vec::with_capacity(rows.len());
    for row in rows {
        match Ticket::from_row(row) {
            Ok(ticket) => tickets.push(ticket),
            Err(e @ sqlx::Error::ColumnDecode { .. }) => {
                let id: Option<TicketId> = row.try_get("id").ok();
                tracing::warn!(?id, error = %e, "Skipping ticket row with an unknown label");
            },
            Err(e) => return Err(e.into()),
        }
    }
    Ok(tickets)
}

/// Count rows per distinct value of one of the whitelisted label columns
async fn group_counts(
    conn: &mut SqliteConnection,
    column: &'static str,
) -> sqlx::Result<Vec<GroupCount>> {
    // `column` is one of three compile-time names, never user input
    let sql = format!(
        "SELECT {column} AS label, COUNT(*) AS count FROM tickets GROUP BY {column} ORDER BY {column}"
    );
    let rows: Vec<(String, i64)> = sqlx::query_as(&sql).fetch_all(conn).await?;
    Ok(rows
        .into_iter()
        .map(|(label, count)| GroupCount { label, count })
        .collect())
}

impl<'r> FromRow<'r, SqliteRow> for Ticket {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let date_creation: NaiveDateTime = row.try_get("date_creation")?;
        Ok(Self {
            id: row.try_get("id")?,
            titre: row.try_get("titre")?,
            description: row.try_get("description")?,
            categorie: label::<Category>(row, "categorie")?,
            priorite: label::<Priority>(row, "priorite")?,
            statut: label::<Status>(row, "statut")?,
            note: row.try_get("note")?,
            date_creation: date_creation.and_utc(),
        })
    }
}

/// Decode a whitelisted label column; values written around validation
/// surface as a decode error
fn label<T>(row: &SqliteRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr<Err = UnknownLabel>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: UnknownLabel| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
