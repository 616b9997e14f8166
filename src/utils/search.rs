use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

/// Case-insensitive substring match of `needle` against a column.
pub fn contains_ci<C: IntoColumnRef>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));

    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
