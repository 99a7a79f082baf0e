//! Provider catalog and provider detail screens.

use leptos::prelude::*;

use super::PageContext;
use super::layout::Shell;
use crate::gateway::Provider;

/// Image path for a provider: lowercased name, whitespace runs collapsed to
/// `-`, everything outside `[a-z0-9-]` dropped.
#[must_use]
pub fn provider_image_path(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug: String = lowered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    format!("/img/providers/{slug}.jpg")
}

#[component]
fn ProviderCard(provider: Provider) -> impl IntoView {
    let href = format!("/provider/{}", provider.id);
    let image = provider_image_path(&provider.name);
    view! {
        <a class="card" href=href>
            <img class="card__image" src=image alt=provider.name.clone() />
            <div class="card__body">
                <h3 class="card__title">{provider.name}</h3>
                <p class="card__meta">{provider.address}</p>
            </div>
        </a>
    }
}

#[component]
pub fn CatalogPage(ctx: PageContext, providers: Vec<Provider>) -> impl IntoView {
    let heading = format!("Explore {} providers", providers.len());
    view! {
        <Shell title="Providers" ctx=ctx>
            <h1 class="page__title">{heading}</h1>
            <div class="catalog">
                {providers
                    .into_iter()
                    .map(|provider| view! { <ProviderCard provider=provider /> })
                    .collect_view()}
            </div>
        </Shell>
    }
}

/// Provider detail. `provider` is `None` when the lookup failed; the notice
/// in `ctx` explains why.
#[component]
pub fn ProviderDetailPage(ctx: PageContext, provider: Option<Provider>) -> impl IntoView {
    let book_href = if ctx.signed_in() {
        provider
            .as_ref()
            .map_or_else(|| "/booking".to_owned(), |p| format!("/booking?provider={}", p.id))
    } else {
        "/signin".to_owned()
    };

    let body = match provider {
        Some(provider) => {
            let image = provider_image_path(&provider.name);
            view! {
                <article class="detail">
                    <img class="detail__image" src=image alt=provider.name.clone() />
                    <div class="detail__body">
                        <h1 class="detail__name">{provider.name}</h1>
                        <p>"Address: " {provider.address}</p>
                        <p>"Tel: " {provider.tel}</p>
                        <a class="button" href=book_href>"Book"</a>
                    </div>
                </article>
            }
            .into_any()
        }
        None => view! { <p class="empty">"Provider not available."</p> }.into_any(),
    };

    view! {
        <Shell title="Provider" ctx=ctx>
            {body}
            <a class="back" href="/provider">"Back to providers"</a>
        </Shell>
    }
}
