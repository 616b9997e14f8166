use crate::{error, Result};
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Resolves the requested 1-based page number. An empty result still has one
/// (empty) page; anything outside `1..=num_pages` is not found. `last` names
/// the final page.
pub fn page_number(requested: Option<&str>, num_pages: u64) -> Result<u64> {
    let num_pages = num_pages.max(1);

    let number = match requested.map(str::trim) {
        None | Some("") => 1,
        Some("last") => num_pages,
        Some(value) => value.parse::<u64>().map_err(|_| error::PAGE_NOT_FOUND)?,
    };

    if number == 0 || number > num_pages {
        return Err(error::PAGE_NOT_FOUND);
    }

    Ok(number)
}

/// Fetches one page of `select`.
pub async fn paginate<'db, E, C>(
    db: &'db C,
    select: Select<E>,
    requested: Option<&str>,
    per_page: u64,
) -> Result<(Vec<E::Model>, PageInfo)>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'db,
    C: ConnectionTrait,
{
    let paginator = select.paginate(db, per_page);
    let totals = paginator.num_items_and_pages().await?;

    let number = page_number(requested, totals.number_of_pages)?;
    let num_pages = totals.number_of_pages.max(1);

    let items = paginator.fetch_page(number - 1).await?;

    Ok((
        items,
        PageInfo {
            number,
            num_pages,
            count: totals.number_of_items,
            has_next: number < num_pages,
            has_previous: number > 1,
        },
    ))
}
