//! `filter`: re-render a persisted reviews CSV through a range filter.

use crate::export::load_review_set;
use crate::render::render_report;
use crate::FilterArgs;

/// # Errors
///
/// Returns an error if the input file cannot be read or parsed.
pub(crate) fn run_filter(args: &FilterArgs) -> anyhow::Result<()> {
    let reviews = load_review_set(&args.input)?;
    let filter = args.range.resolve(&reviews);
    tracing::debug!(
        input = %args.input.display(),
        reviews = reviews.len(),
        explicit_bounds = !args.range.is_empty(),
        "filtering persisted reviews"
    );
    print!("{}", render_report(&reviews, &filter));
    Ok(())
}
