//! Admin booking statistics.

use std::cmp::Reverse;

use leptos::prelude::*;

use super::PageContext;
use super::layout::Shell;
use crate::gateway::ProviderStat;

/// One table row: 1-based rank after sorting by booking count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedStat {
    pub rank: usize,
    pub provider: String,
    pub total_bookings: u64,
}

/// Sort by `total_bookings` descending (ties keep backend order), rank
/// 1..n, and sum the grand total.
#[must_use]
pub fn rank_stats(mut stats: Vec<ProviderStat>) -> (Vec<RankedStat>, u64) {
    stats.sort_by_key(|stat| Reverse(stat.total_bookings));
    let total = stats.iter().map(|stat| stat.total_bookings).sum();
    let ranked = stats
        .into_iter()
        .enumerate()
        .map(|(i, stat)| RankedStat { rank: i + 1, provider: stat.provider, total_bookings: stat.total_bookings })
        .collect();
    (ranked, total)
}

pub const EMPTY_STATS_TEXT: &str = "No booking statistics available.";

#[component]
pub fn StatsPage(ctx: PageContext, rows: Vec<RankedStat>, total: u64) -> impl IntoView {
    let body = if rows.is_empty() {
        view! { <p class="empty">{EMPTY_STATS_TEXT}</p> }.into_any()
    } else {
        let provider_count = rows.len();
        view! {
            <dl class="stats__summary">
                <div class="stats__card">
                    <dt>"Total Bookings"</dt>
                    <dd class="stats__total">{total}</dd>
                </div>
                <div class="stats__card">
                    <dt>"Total Providers"</dt>
                    <dd class="stats__providers">{provider_count}</dd>
                </div>
            </dl>
            <table class="stats">
                <thead>
                    <tr>
                        <th>"Rank"</th>
                        <th>"Provider"</th>
                        <th>"Total Bookings"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    <td>{row.rank}</td>
                                    <td>{row.provider}</td>
                                    <td>{row.total_bookings}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
                <tfoot>
                    <tr>
                        <td colspan="2">"Total"</td>
                        <td>{total}</td>
                    </tr>
                </tfoot>
            </table>
        }
        .into_any()
    };

    view! {
        <Shell title="Booking Statistics" ctx=ctx>
            <h1 class="page__title">"Booking Statistics"</h1>
            {body}
        </Shell>
    }
}

/// Rendered for signed-in viewers who are not admins.
#[component]
pub fn NotAuthorizedPage(ctx: PageContext) -> impl IntoView {
    view! {
        <Shell title="Not authorized" ctx=ctx>
            <p class="empty">"You are not authorized to view booking statistics."</p>
        </Shell>
    }
}
