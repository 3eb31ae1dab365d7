use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner, Textarea,
};
use crate::models::{Category, Prompt};
use crate::state::create_flow::{
    create_category_then_prompt, validate_submission, CategoryPicker, NewPromptInput, PickerMode,
};
use crate::state::store::CatalogStore;
use crate::state::{AppContext, CategoryUiActions};
use crate::storage::{load_recent_prompts, save_user_to_storage, CURRENT_CATEGORY_KEY, SIDEBAR_COLLAPSED_KEY};
use crate::taxonomy::{
    ancestors_to_expand, build_forest, group_by_category, resolve_depths, unreachable_ids, Bucket,
    CategoryForest, DepthMap,
};
use crate::util::{content_preview, parse_tags};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use leptos_router::hooks::{use_location, use_navigate, use_query_map};
use leptos_router::params::Params;
use std::collections::{HashMap, HashSet};
use wasm_bindgen::JsCast;

const SELECT_CLASS: &str =
    "h-8 w-full rounded-md border border-border bg-background px-2 text-sm";

/// Current value of a native `<select>`, with the empty placeholder mapped to
/// `None`.
fn select_value(ev: &web_sys::Event) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        .map(|s| s.value())
        .filter(|v| !v.is_empty())
}

fn persist_current_category(id: Option<&str>) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(CURRENT_CATEGORY_KEY, id.unwrap_or_default());
    }
}

/// Preorder flattening of the category tree into `(id, indented label)` pairs
/// for `<select>` options and ordered section lists. Categories that cannot be
/// reached from any root (dangling or cyclic parent chains) are appended flat
/// at the end so they stay addressable.
fn flattened_options(categories: &[Category]) -> Vec<(String, String)> {
    fn walk(
        forest: &CategoryForest,
        depths: &DepthMap,
        node: &Category,
        out: &mut Vec<(String, String)>,
    ) {
        let depth = depths.depth_of(&node.id).unwrap_or(0);
        let label = format!("{}{}", "— ".repeat(depth), node.name);
        out.push((node.id.clone(), label));
        for child in forest.children_of(&node.id) {
            walk(forest, depths, child, out);
        }
    }

    let forest = build_forest(categories);
    let depths = resolve_depths(categories);
    let mut out = Vec::with_capacity(categories.len());
    for root in &forest.roots {
        walk(&forest, &depths, root, &mut out);
    }

    let orphaned = unreachable_ids(categories);
    for c in categories {
        if orphaned.contains(&c.id) {
            out.push((c.id.clone(), c.name.clone()));
        }
    }

    out
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(session) => {
                    api_client.set_token(session.token);
                    api_client.save_to_storage();
                    save_user_to_storage(&session.account);
                    app_state.0.api_client.set(api_client);
                    app_state.0.current_user.set(Some(session.account));
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Promptdeck"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Log in"</CardTitle>
                        <CardDescription class="text-xs">"Use your email and password to continue."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="email" class="text-xs">"Email"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="you@example.com"
                                bind_value=email
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="password" class="text-xs">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="••••••••"
                                bind_value=password
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                error.get().map(|e| {
                                    view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">
                                                {e}
                                            </AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}
                        </Show>

                        <Button
                            class="w-full"
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Signing in..." } else { "Continue" }}
                            </span>
                        </Button>

                        <div class="pt-1 text-xs text-muted-foreground">
                            "No account? "
                            <a class="text-primary underline underline-offset-4" href="/signup">"Sign up"</a>
                        </div>
                    </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn RegistrationPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let username: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let success: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let username_val = username.get();
        let password_val = password.get();
        let confirm_password_val = confirm_password.get();
        let api_client = app_state.0.api_client.get_untracked();

        if password_val != confirm_password_val {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }

        if password_val.len() < 6 {
            error.set(Some("Password must be at least 6 characters".to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client
                .register(&email_val, &username_val, &password_val)
                .await
            {
                Ok(_session) => {
                    // The backend returns a token on signup; we keep UX simple
                    // and ask the user to sign in.
                    success.set(true);
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Promptdeck"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Create account"</CardTitle>
                        <CardDescription class="text-xs">"A place for your prompt library."</CardDescription>
                    </CardHeader>
                    <CardContent>

                    <Show
                        when=move || !success.get()
                        fallback=move || view! {
                            <Alert>
                                <AlertDescription class="text-xs">
                                    "Account created. You can now "
                                    <a class="text-primary underline underline-offset-4" href="/login">"log in"</a>
                                    "."
                                </AlertDescription>
                            </Alert>
                        }
                    >
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="username" class="text-xs">"Username"</Label>
                                <Input
                                    id="username"
                                    r#type="text"
                                    placeholder="yourname"
                                    bind_value=username
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="confirm_password" class="text-xs">"Confirm password"</Label>
                                <Input
                                    id="confirm_password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=confirm_password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| {
                                        view! {
                                            <Alert class="border-destructive/30">
                                                <AlertDescription class="text-destructive text-xs">
                                                    {e}
                                                </AlertDescription>
                                            </Alert>
                                        }
                                    })
                                }}
                            </Show>

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Creating..." } else { "Continue" }}
                                </span>
                            </Button>

                            <div class="pt-1 text-xs text-muted-foreground">
                                "Already have an account? "
                                <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
                            </div>
                        </form>
                    </Show>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

/// Shared per-render context for the recursive sidebar tree.
struct TreeRowCtx<'a> {
    forest: &'a CategoryForest,
    expanded: &'a HashSet<String>,
    expanded_sig: RwSignal<HashSet<String>>,
    selected: Option<&'a str>,
    counts: &'a HashMap<String, usize>,
    actions: &'a CategoryUiActions,
}

/// One sidebar tree row plus, when expanded, its subtree. Recursion starts
/// from forest roots only, so a cyclic parent chain can never enter here.
fn category_branch_view(ctx: &TreeRowCtx<'_>, node: &Category, depth: usize) -> AnyView {
    let kids = ctx.forest.children_of(&node.id);
    let has_kids = !kids.is_empty();
    let is_expanded = ctx.expanded.contains(&node.id);
    let is_selected = ctx.selected == Some(node.id.as_str());
    let count = ctx.counts.get(&node.id).copied().unwrap_or(0);

    let variant = if is_selected {
        ButtonVariant::Accent
    } else {
        ButtonVariant::Ghost
    };

    let expanded_sig = ctx.expanded_sig;
    let open_new_prompt = ctx.actions.open_new_prompt;
    let open_rename = ctx.actions.open_rename;
    let open_delete = ctx.actions.open_delete;

    let id_href = node.id.clone();
    let id_for_toggle = node.id.clone();
    let id_for_add = node.id.clone();
    let id_for_rename = node.id.clone();
    let id_for_delete = node.id.clone();
    let name_label = node.name.clone();
    let name_for_rename = node.name.clone();
    let name_for_delete = node.name.clone();

    let chevron = if has_kids {
        view! {
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="h-6 w-6 shrink-0"
                attr:title=if is_expanded { "Collapse" } else { "Expand" }
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    expanded_sig.update(|s| {
                        if !s.remove(&id_for_toggle) {
                            s.insert(id_for_toggle.clone());
                        }
                    });
                }
            >
                <span class="text-xs text-muted-foreground">
                    {if is_expanded { "▾" } else { "▸" }}
                </span>
            </Button>
        }
        .into_any()
    } else {
        view! { <span class="inline-block h-6 w-6 shrink-0"></span> }.into_any()
    };

    let count_badge = if count > 0 {
        view! { <span class="shrink-0 text-[11px] text-muted-foreground">{count}</span> }
            .into_any()
    } else {
        ().into_any()
    };

    let child_views = if is_expanded {
        kids.iter()
            .map(|k| category_branch_view(ctx, k, depth + 1))
            .collect_view()
            .into_any()
    } else {
        ().into_any()
    };

    view! {
        <div class="min-w-0">
            <div
                class="group flex min-w-0 items-center gap-1"
                style=format!("padding-left: {}px", depth * 12)
            >
                {chevron}
                <Button
                    variant=variant
                    size=ButtonSize::Sm
                    class="min-w-0 flex-1 justify-start"
                    attr:aria-current=move || {
                        if is_selected { Some("page") } else { None }
                    }
                    href=format!("/c/{}", id_href)
                >
                    <span class="min-w-0 flex-1 truncate text-left">{name_label}</span>
                    {count_badge}
                </Button>

                <div class="hidden shrink-0 items-center gap-1 group-hover:flex">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="h-6 w-6"
                        attr:title="New prompt here"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            open_new_prompt.run(Some(id_for_add.clone()));
                        }
                    >
                        <span class="text-xs text-muted-foreground">"+"</span>
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="h-6 w-6"
                        attr:title="Rename"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            open_rename.run((id_for_rename.clone(), name_for_rename.clone()));
                        }
                    >
                        <svg
                            xmlns="http://www.w3.org/2000/svg"
                            width="14"
                            height="14"
                            viewBox="0 0 24 24"
                            fill="none"
                            stroke="currentColor"
                            stroke-width="2"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                            class="text-muted-foreground"
                            aria-hidden="true"
                        >
                            <path d="M12 20h9" />
                            <path d="M16.5 3.5a2.121 2.121 0 0 1 3 3L7 19l-4 1 1-4Z" />
                        </svg>
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="h-6 w-6 text-destructive"
                        attr:title="Delete"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            open_delete.run((id_for_delete.clone(), name_for_delete.clone()));
                        }
                    >
                        <svg
                            xmlns="http://www.w3.org/2000/svg"
                            width="14"
                            height="14"
                            viewBox="0 0 24 24"
                            fill="none"
                            stroke="currentColor"
                            stroke-width="2"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                            aria-hidden="true"
                        >
                            <path d="M3 6h18" />
                            <path d="M8 6V4h8v2" />
                            <path d="M19 6l-1 14H6L5 6" />
                            <path d="M10 11v6" />
                            <path d="M14 11v6" />
                        </svg>
                    </Button>
                </div>
            </div>
            {child_views}
        </div>
    }
    .into_any()
}

/// Flat row for a category whose parent chain is dangling or cyclic. Rendered
/// without a chevron and never recursed into.
fn orphan_row_view(node: &Category, selected: Option<&str>, actions: &CategoryUiActions) -> AnyView {
    let is_selected = selected == Some(node.id.as_str());
    let variant = if is_selected {
        ButtonVariant::Accent
    } else {
        ButtonVariant::Ghost
    };

    let open_rename = actions.open_rename;
    let open_delete = actions.open_delete;
    let id_href = node.id.clone();
    let id_for_rename = node.id.clone();
    let id_for_delete = node.id.clone();
    let name_label = node.name.clone();
    let name_for_rename = node.name.clone();
    let name_for_delete = node.name.clone();

    view! {
        <div class="group flex min-w-0 items-center gap-1">
            <span class="inline-block h-6 w-6 shrink-0"></span>
            <Button
                variant=variant
                size=ButtonSize::Sm
                class="min-w-0 flex-1 justify-start"
                href=format!("/c/{}", id_href)
            >
                <span class="min-w-0 flex-1 truncate text-left">{name_label}</span>
            </Button>
            <div class="hidden shrink-0 items-center gap-1 group-hover:flex">
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="h-6 w-6"
                    attr:title="Rename"
                    on:click=move |ev: web_sys::MouseEvent| {
                        ev.stop_propagation();
                        open_rename.run((id_for_rename.clone(), name_for_rename.clone()));
                    }
                >
                    <span class="text-xs text-muted-foreground">"✎"</span>
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="h-6 w-6 text-destructive"
                    attr:title="Delete"
                    on:click=move |ev: web_sys::MouseEvent| {
                        ev.stop_propagation();
                        open_delete.run((id_for_delete.clone(), name_for_delete.clone()));
                    }
                >
                    <span class="text-xs">"×"</span>
                </Button>
            </div>
        </div>
    }
    .into_any()
}

fn prompt_row_view(p: &Prompt, category_name: Option<String>) -> AnyView {
    let id = p.id.clone();
    let title = p.title.clone();
    let preview = content_preview(&p.content, 96);
    let is_favorite = p.is_favorite;

    view! {
        <a
            href=format!("/p/{}", id)
            class="block rounded-md border border-border bg-background px-3 py-2 transition-colors hover:bg-surface-hover"
        >
            <div class="flex min-w-0 items-center gap-2">
                <Show when=move || is_favorite fallback=|| ().into_view()>
                    <span class="shrink-0 text-xs text-primary" title="Favorite">"★"</span>
                </Show>
                <div class="truncate text-sm font-medium">{title}</div>
            </div>
            <div class="min-h-[1rem] truncate text-xs text-muted-foreground">{preview}</div>
            {category_name
                .map(|n| {
                    view! {
                        <div class="mt-1 truncate text-[11px] text-muted-foreground">{n}</div>
                    }
                    .into_any()
                })
                .unwrap_or_else(|| ().into_any())}
        </a>
    }
    .into_any()
}

#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = StoredValue::new(CatalogStore::new(expect_context::<AppContext>()));

    let categories = app_state.0.categories;
    let prompts = app_state.0.prompts;
    let categories_loading = app_state.0.categories_loading;
    let categories_error = app_state.0.categories_error;
    let current_category_id = app_state.0.current_category_id;
    let expanded_ids = app_state.0.expanded_category_ids;
    let sidebar_collapsed = app_state.0.sidebar_collapsed;
    let search_query = app_state.0.search_query;

    // Create category dialog state.
    let create_open: RwSignal<bool> = RwSignal::new(false);
    let create_name: RwSignal<String> = RwSignal::new(String::new());
    let create_desc: RwSignal<String> = RwSignal::new(String::new());
    let create_parent: RwSignal<Option<String>> = RwSignal::new(None);
    let create_error: RwSignal<Option<String>> = RwSignal::new(None);
    let create_loading: RwSignal<bool> = RwSignal::new(false);

    // Rename category dialog state.
    let rename_open: RwSignal<bool> = RwSignal::new(false);
    let rename_cat_id: RwSignal<Option<String>> = RwSignal::new(None);
    let rename_value: RwSignal<String> = RwSignal::new(String::new());
    let rename_loading: RwSignal<bool> = RwSignal::new(false);
    let rename_error: RwSignal<Option<String>> = RwSignal::new(None);

    // Delete category dialog state (type-name-to-confirm).
    let delete_open: RwSignal<bool> = RwSignal::new(false);
    let delete_cat_id: RwSignal<Option<String>> = RwSignal::new(None);
    let delete_cat_name: RwSignal<String> = RwSignal::new(String::new());
    let delete_confirm: RwSignal<String> = RwSignal::new(String::new());
    let delete_loading: RwSignal<bool> = RwSignal::new(false);
    let delete_error: RwSignal<Option<String>> = RwSignal::new(None);

    // New prompt dialog state. Category choice lives in the picker; the
    // inline new-category draft fields mirror into it on submit.
    let np_open: RwSignal<bool> = RwSignal::new(false);
    let np_title: RwSignal<String> = RwSignal::new(String::new());
    let np_content: RwSignal<String> = RwSignal::new(String::new());
    let np_desc: RwSignal<String> = RwSignal::new(String::new());
    let np_tags: RwSignal<String> = RwSignal::new(String::new());
    let np_favorite: RwSignal<bool> = RwSignal::new(false);
    let np_error: RwSignal<Option<String>> = RwSignal::new(None);
    let np_loading: RwSignal<bool> = RwSignal::new(false);
    let picker: RwSignal<CategoryPicker> = RwSignal::new(CategoryPicker::default());
    let np_new_name: RwSignal<String> = RwSignal::new(String::new());
    let np_new_desc: RwSignal<String> = RwSignal::new(String::new());
    let np_new_parent: RwSignal<Option<String>> = RwSignal::new(None);

    let search_ref: NodeRef<html::Input> = NodeRef::new();
    let create_name_ref: NodeRef<html::Input> = NodeRef::new();

    let navigate = StoredValue::new(use_navigate());
    let location = use_location();
    let pathname = move || location.pathname.get();
    let pathname_untracked = move || location.pathname.get_untracked();

    let sidebar_width_class = move || {
        if sidebar_collapsed.get() {
            "w-14"
        } else {
            "w-72"
        }
    };

    let persist_sidebar = move || {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(
                SIDEBAR_COLLAPSED_KEY,
                if sidebar_collapsed.get() { "1" } else { "0" },
            );
        }
    };

    let open_create_dialog = move |parent: Option<String>| {
        create_name.set(String::new());
        create_desc.set(String::new());
        create_parent.set(parent);
        create_error.set(None);
        create_open.set(true);

        // Focus is handled by an Effect once the dialog is mounted.
    };

    let open_rename_dialog = move |id: String, name: String| {
        rename_cat_id.set(Some(id));
        rename_value.set(name);
        rename_error.set(None);
        rename_open.set(true);
    };

    let open_delete_dialog = move |id: String, name: String| {
        delete_cat_id.set(Some(id));
        delete_cat_name.set(name);
        delete_confirm.set(String::new());
        delete_error.set(None);
        delete_open.set(true);
    };

    let open_new_prompt_dialog = move |category: Option<String>| {
        np_title.set(String::new());
        np_content.set(String::new());
        np_desc.set(String::new());
        np_tags.set(String::new());
        np_favorite.set(false);
        np_error.set(None);
        np_new_name.set(String::new());
        np_new_desc.set(String::new());
        np_new_parent.set(None);

        let mut p = CategoryPicker::default();
        if let Some(id) = category {
            let cats = categories.get_untracked();
            let parent = cats
                .iter()
                .find(|c| c.id == id)
                .and_then(|c| c.parent_ref().map(str::to_string));
            match parent {
                Some(pid) => {
                    p.select_parent(Some(pid));
                    p.select_child(Some(id));
                }
                None => p.select_parent(Some(id)),
            }
        }
        picker.set(p);
        np_open.set(true);
    };

    let actions = CategoryUiActions {
        open_create: Callback::new(move |parent| open_create_dialog(parent)),
        open_rename: Callback::new(move |(id, name)| open_rename_dialog(id, name)),
        open_delete: Callback::new(move |(id, name)| open_delete_dialog(id, name)),
        open_new_prompt: Callback::new(move |category| open_new_prompt_dialog(category)),
    };
    provide_context(actions.clone());

    // Focus the category name input when the create dialog opens.
    Effect::new(move |_| {
        if !create_open.get() {
            return;
        }

        // Defer to next tick so the Input is mounted.
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                if let Some(el) = create_name_ref.get_untracked() {
                    let _ = el.focus();
                }
            })
            .as_ref()
            .unchecked_ref(),
            0,
        );
    });

    let submit_create_category = move || {
        if create_loading.get_untracked() {
            return;
        }

        let name = create_name.get_untracked();
        if name.trim().is_empty() {
            create_error.set(Some("Category name is required".to_string()));
            return;
        }

        let desc = create_desc.get_untracked();
        let parent = create_parent.get_untracked();

        create_loading.set(true);
        create_error.set(None);

        let s = store.get_value();
        spawn_local(async move {
            let req = crate::api::NewCategoryRequest {
                name: name.trim().to_string(),
                description: if desc.trim().is_empty() {
                    None
                } else {
                    Some(desc.trim().to_string())
                },
                parent_id: parent,
                ..Default::default()
            };
            match s.create_category(req).await {
                Ok(created) => {
                    // Reveal the new node in the tree.
                    if let Some(pid) = created.parent_ref() {
                        let pid = pid.to_string();
                        expanded_ids.update(|set| {
                            set.insert(pid);
                        });
                    }
                    create_open.set(false);
                }
                Err(e) => s.surface_error(&e, create_error),
            }
            create_loading.set(false);
        });
    };

    let on_submit_rename = move |_: web_sys::MouseEvent| {
        if rename_loading.get_untracked() {
            return;
        }

        let id = rename_cat_id.get_untracked().unwrap_or_default();
        let new_name = rename_value.get_untracked();
        if id.trim().is_empty() {
            return;
        }
        if new_name.trim().is_empty() {
            rename_error.set(Some("Name cannot be empty".to_string()));
            return;
        }

        rename_loading.set(true);
        rename_error.set(None);

        let s = store.get_value();
        spawn_local(async move {
            let req = crate::api::UpdateCategoryRequest {
                name: Some(new_name.trim().to_string()),
                ..Default::default()
            };
            match s.update_category(&id, req).await {
                Ok(_) => rename_open.set(false),
                Err(e) => s.surface_error(&e, rename_error),
            }
            rename_loading.set(false);
        });
    };

    let on_submit_delete = move |_: web_sys::MouseEvent| {
        if delete_loading.get_untracked() {
            return;
        }

        let id = delete_cat_id.get_untracked().unwrap_or_default();
        let name = delete_cat_name.get_untracked();
        let confirm = delete_confirm.get_untracked();
        if id.trim().is_empty() {
            return;
        }
        if confirm.trim() != name.trim() {
            delete_error.set(Some(
                "Type the category name to confirm deletion".to_string(),
            ));
            return;
        }

        delete_loading.set(true);
        delete_error.set(None);

        let s = store.get_value();
        spawn_local(async move {
            match s.delete_category(&id).await {
                Ok(_) => {
                    delete_open.set(false);
                    persist_current_category(None);

                    // If we are currently inside this category, go Home.
                    if pathname_untracked().starts_with(&format!("/c/{id}")) {
                        navigate.with_value(|nav| nav("/", Default::default()));
                    }
                }
                Err(e) => s.surface_error(&e, delete_error),
            }
            delete_loading.set(false);
        });
    };

    let submit_new_prompt = move || {
        if np_loading.get_untracked() {
            return;
        }

        if picker.get_untracked().mode == PickerMode::CreatingNew {
            picker.update(|p| {
                p.draft.name = np_new_name.get_untracked();
                p.draft.description = np_new_desc.get_untracked();
                p.draft.parent_id = np_new_parent.get_untracked();
            });
        }

        let choice = picker.get_untracked().choice();
        let input = NewPromptInput {
            title: np_title.get_untracked(),
            content: np_content.get_untracked(),
            description: Some(np_desc.get_untracked()),
            is_favorite: np_favorite.get_untracked(),
            tags: parse_tags(&np_tags.get_untracked()),
        };

        // Validation failures must never reach the network.
        if let Err(e) = validate_submission(&choice, &input) {
            np_error.set(Some(e.to_string()));
            return;
        }

        np_loading.set(true);
        np_error.set(None);

        let client = app_state.0.api_client.get_untracked();
        let s = store.get_value();
        spawn_local(async move {
            match create_category_then_prompt(&client, choice, input).await {
                Ok((prompt, created_category)) => {
                    if let Some(cat) = &created_category {
                        if let Some(pid) = cat.parent_ref() {
                            let pid = pid.to_string();
                            expanded_ids.update(|set| {
                                set.insert(pid);
                            });
                        }
                        s.spawn_load_categories();
                    }
                    s.spawn_load_prompts();
                    np_open.set(false);
                    navigate
                        .with_value(|nav| nav(&format!("/p/{}", prompt.id), Default::default()));
                }
                Err(e) => np_error.set(Some(e.to_string())),
            }
            np_loading.set(false);
        });
    };

    // Initial load when we enter the authenticated shell.
    Effect::new(move |_| {
        let authed = app_state.0.api_client.get().is_authenticated();
        if !authed {
            return;
        }

        // Avoid tracking loading flags here; they toggle during loads and
        // would re-trigger this Effect.
        if categories_loading.get_untracked() || app_state.0.prompts_loading.get_untracked() {
            return;
        }

        if !app_state.0.catalog_loaded_once.get_untracked() {
            store.get_value().spawn_load_all();
        }
    });

    // Home shows the whole library; drop any category highlight there.
    Effect::new(move |_| {
        if pathname() == "/" && current_category_id.get_untracked().is_some() {
            current_category_id.set(None);
            persist_current_category(None);
        }
    });

    let on_toggle_sidebar = move |_| {
        sidebar_collapsed.update(|v| *v = !*v);
        persist_sidebar();
    };

    // Keyboard shortcuts:
    // - Cmd/Ctrl+B: toggle sidebar
    // - Cmd/Ctrl+K: focus search
    // - Esc: blur search
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let is_meta = ev.meta_key() || ev.ctrl_key();
        let key = ev.key().to_lowercase();

        // Avoid hijacking shortcuts while typing in inputs.
        let target_tag = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.tag_name().to_lowercase());

        if let Some(tag) = target_tag {
            if tag == "input" || tag == "textarea" {
                // Allow Escape to still blur.
                if key != "escape" {
                    return;
                }
            }
        }

        if is_meta && key == "b" {
            ev.prevent_default();
            sidebar_collapsed.update(|v| *v = !*v);
            persist_sidebar();
            return;
        }

        if is_meta && key == "k" {
            ev.prevent_default();
            if let Some(input) = search_ref.get() {
                let _ = input.focus();
            }
            return;
        }

        if key == "escape" {
            if let Some(input) = search_ref.get() {
                let _ = input.blur();
            }
        }
    });

    let on_logout = move |_| {
        let mut api_client = app_state.0.api_client.get_untracked();
        api_client.logout();
        app_state.0.api_client.set(api_client);
        app_state.0.current_user.set(None);
        categories.set(vec![]);
        prompts.set(vec![]);
        current_category_id.set(None);
        persist_current_category(None);
        let _ = window().location().set_href("/login");
    };

    let current_category_name = move || {
        let id = current_category_id.get();
        let cats = categories.get();
        id.and_then(|id| cats.into_iter().find(|c| c.id == id).map(|c| c.name))
    };

    let actions_for_tree = actions.clone();

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-5xl gap-4 px-4 py-6">
                <aside class=move || format!("{} shrink-0", sidebar_width_class())>
                    <div class="sticky top-6 space-y-4">
                        <div class="flex items-center justify-between">
                            <a href="/" class="text-sm font-medium text-foreground">
                                <Show when=move || !sidebar_collapsed.get() fallback=|| view! { "P" }>
                                    "Promptdeck"
                                </Show>
                            </a>

                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Icon
                                on:click=on_toggle_sidebar
                                attr:title="Toggle sidebar"
                                class="h-8 w-8"
                            >
                                <span class="text-xs text-muted-foreground">
                                    {move || if sidebar_collapsed.get() { ">" } else { "<" }}
                                </span>
                            </Button>
                        </div>

                        <Show
                            when=move || !sidebar_collapsed.get()
                            fallback=|| view! {
                                <Card>
                                    <CardContent>
                                        <div class="text-xs text-muted-foreground">"Sidebar collapsed"</div>
                                    </CardContent>
                                </Card>
                            }
                        >
                            <Card>
                                <CardContent class="p-3">
                                    <div class="flex items-center gap-2">
                                        <span class="sr-only">"Search"</span>
                                        <svg
                                            xmlns="http://www.w3.org/2000/svg"
                                            width="16"
                                            height="16"
                                            viewBox="0 0 24 24"
                                            fill="none"
                                            stroke="currentColor"
                                            stroke-width="2"
                                            stroke-linecap="round"
                                            stroke-linejoin="round"
                                            class="shrink-0 text-muted-foreground"
                                            aria-hidden="true"
                                        >
                                            <circle cx="11" cy="11" r="8"></circle>
                                            <path d="m21 21-4.3-4.3"></path>
                                        </svg>

                                        <div class="min-w-0 flex-1">
                                            <Input
                                                node_ref=search_ref
                                                r#type="search"
                                                placeholder="Search…"
                                                bind_value=search_query
                                                class="h-8 text-sm"
                                                on:keydown=move |ev: web_sys::KeyboardEvent| {
                                                    if ev.key() == "Enter" {
                                                        let q = search_query.get();
                                                        navigate.with_value(|nav| {
                                                            nav(&format!("/search?q={}", urlencoding::encode(&q)), Default::default());
                                                        });
                                                    }
                                                }
                                            />
                                        </div>

                                        <div class="hidden shrink-0 items-center gap-1 text-xs text-muted-foreground sm:flex">
                                            <span class="rounded-md border border-border bg-surface px-2 py-1 font-mono text-[11px]">
                                                "⌘K"
                                            </span>
                                        </div>
                                    </div>
                                </CardContent>
                            </Card>

                            <Card>
                                <CardHeader class="flex flex-row items-center justify-between p-3">
                                    <CardTitle class="text-sm">"Categories"</CardTitle>
                                    <div class="flex items-center gap-2">
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Icon
                                            on:click=move |_| open_create_dialog(None)
                                            attr:title="New category"
                                            class="h-7 w-7"
                                        >
                                            <span class="text-xs text-muted-foreground">"+"</span>
                                        </Button>
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Icon
                                            on:click=move |_| store.get_value().spawn_load_all()
                                            attr:title="Refresh"
                                            class="h-7 w-7"
                                        >
                                            <span class="text-xs text-muted-foreground">"↻"</span>
                                        </Button>
                                    </div>
                                </CardHeader>
                                <CardContent class="p-3 pt-0">
                                    <Show when=move || categories_error.get().is_some() fallback=|| ().into_view()>
                                        {move || categories_error.get().map(|e| view! {
                                            <div class="mt-2 text-[11px] text-destructive">{e}</div>
                                        })}
                                    </Show>

                                    <div class="mt-2 space-y-1">
                                        <Show
                                            when=move || !categories.get().is_empty()
                                            fallback=move || view! {
                                                <div class="text-[11px] text-muted-foreground">
                                                    {move || if categories_loading.get() { "Loading..." } else { "No categories" }}
                                                </div>
                                            }
                                        >
                                            {
                                                let actions = actions_for_tree.clone();
                                                move || {
                                                    let cats = categories.get();
                                                    let ps = prompts.get();
                                                    let expanded_set = expanded_ids.get();
                                                    let selected = current_category_id.get();
                                                    let allow_highlight = pathname().starts_with("/c/");

                                                    let counts: HashMap<String, usize> = group_by_category(&ps, &cats)
                                                        .into_iter()
                                                        .filter_map(|(bucket, items)| match bucket {
                                                            Bucket::Category(id) => Some((id, items.len())),
                                                            Bucket::Uncategorized => None,
                                                        })
                                                        .collect();

                                                    let forest = build_forest(&cats);
                                                    let orphaned = unreachable_ids(&cats);

                                                    let ctx = TreeRowCtx {
                                                        forest: &forest,
                                                        expanded: &expanded_set,
                                                        expanded_sig: expanded_ids,
                                                        selected: if allow_highlight { selected.as_deref() } else { None },
                                                        counts: &counts,
                                                        actions: &actions,
                                                    };

                                                    let mut rows: Vec<AnyView> = forest
                                                        .roots
                                                        .iter()
                                                        .map(|c| category_branch_view(&ctx, c, 0))
                                                        .collect();

                                                    if !orphaned.is_empty() {
                                                        rows.push(view! { <div class="h-px w-full bg-border" /> }.into_any());
                                                        rows.push(
                                                            view! {
                                                                <div class="px-2 text-[11px] text-muted-foreground">"Unfiled"</div>
                                                            }
                                                            .into_any(),
                                                        );
                                                        for c in cats.iter().filter(|c| orphaned.contains(&c.id)) {
                                                            rows.push(orphan_row_view(
                                                                c,
                                                                if allow_highlight { selected.as_deref() } else { None },
                                                                &actions,
                                                            ));
                                                        }
                                                    }

                                                    rows
                                                }
                                            }
                                        </Show>
                                    </div>
                                </CardContent>
                            </Card>

                            <Show when=move || pathname() == "/" fallback=|| ().into_view()>
                                <Card>
                                    <CardHeader class="p-3">
                                        <CardTitle class="text-sm">"Recent Prompts"</CardTitle>
                                    </CardHeader>
                                    <CardContent class="p-3 pt-0">
                                        <Show
                                            when=move || !load_recent_prompts().is_empty()
                                            fallback=|| view! { <div class="text-sm text-muted-foreground">"No recent prompts."</div> }
                                        >
                                            <div class="space-y-1">
                                                {move || {
                                                    load_recent_prompts()
                                                        .into_iter()
                                                        .map(|r| {
                                                            let id = r.prompt_id.clone();
                                                            let title = r.title.clone();
                                                            view! {
                                                                <a
                                                                    href=format!("/p/{}", id)
                                                                    class="block rounded-md border border-border bg-background px-3 py-2 transition-colors hover:bg-surface-hover"
                                                                >
                                                                    <div class="truncate text-sm font-medium">{title}</div>
                                                                </a>
                                                            }
                                                        })
                                                        .collect_view()
                                                }}
                                            </div>
                                        </Show>
                                    </CardContent>
                                </Card>
                            </Show>

                            <Card>
                                <CardContent class="p-3">
                                    <span class="sr-only">"Account"</span>
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=on_logout
                                        class="w-full"
                                    >
                                        "Sign out"
                                    </Button>
                                </CardContent>
                            </Card>
                        </Show>
                    </div>
                </aside>

                <main class="min-w-0 flex-1">
                    <div class="mb-4 flex items-center justify-between gap-3">
                        <nav class="min-w-0" aria-label="Breadcrumb">
                            {move || {
                                let p = pathname();

                                if p.starts_with("/c/") {
                                    let name = current_category_name()
                                        .unwrap_or_else(|| "Category".to_string());
                                    return view! {
                                        <div class="flex min-w-0 items-center gap-2 text-sm">
                                            <a
                                                href="/"
                                                class="min-w-0 truncate font-medium text-foreground hover:underline"
                                            >
                                                "All prompts"
                                            </a>
                                            <span class="text-muted-foreground">"›"</span>
                                            <div class="min-w-0 truncate font-medium">{name}</div>
                                        </div>
                                    }
                                    .into_any();
                                }

                                if p.starts_with("/p/") || p.starts_with("/search") {
                                    return view! {
                                        <div class="flex min-w-0 items-center gap-2 text-sm">
                                            <a
                                                href="/"
                                                class="min-w-0 truncate font-medium text-foreground hover:underline"
                                            >
                                                "All prompts"
                                            </a>
                                        </div>
                                    }
                                    .into_any();
                                }

                                view! { <div class="truncate text-sm font-medium"></div> }.into_any()
                            }}
                        </nav>

                        <div class="flex shrink-0 items-center gap-2"></div>
                    </div>
                    {children()}
                </main>

                <Show when=move || create_open.get() fallback=|| ().into_view()>
                    <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                        <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                            <div class="mb-3 space-y-1">
                                <div class="text-sm font-medium">"New category"</div>
                            </div>

                            <div class="space-y-2">
                                <div class="space-y-1">
                                    <Label class="text-xs">"Name"</Label>
                                    <Input
                                        node_ref=create_name_ref
                                        bind_value=create_name
                                        class="h-8 text-sm border-border bg-background"
                                    />
                                </div>
                                <div class="space-y-1">
                                    <Label class="text-xs">"Description (optional)"</Label>
                                    <Input
                                        bind_value=create_desc
                                        class="h-8 text-sm border-border bg-background"
                                    />
                                </div>
                                <div class="space-y-1">
                                    <Label class="text-xs">"Parent (optional)"</Label>
                                    <select
                                        class=SELECT_CLASS
                                        prop:value=move || create_parent.get().unwrap_or_default()
                                        on:change=move |ev: web_sys::Event| {
                                            create_parent.set(select_value(&ev));
                                        }
                                    >
                                        <option value="">"No parent (top level)"</option>
                                        {move || {
                                            flattened_options(&categories.get())
                                                .into_iter()
                                                .map(|(id, label)| view! { <option value=id>{label}</option> })
                                                .collect_view()
                                        }}
                                    </select>
                                </div>

                                <Show when=move || create_error.get().is_some() fallback=|| ().into_view()>
                                    {move || create_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:disabled=move || create_loading.get()
                                        on:click=move |_| create_open.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button
                                        size=ButtonSize::Sm
                                        attr:disabled=move || create_loading.get()
                                        on:click=move |_| submit_create_category()
                                    >
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=move || create_loading.get() fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            {move || if create_loading.get() { "Creating..." } else { "Create" }}
                                        </span>
                                    </Button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>

                <Show when=move || rename_open.get() fallback=|| ().into_view()>
                    <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                        <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                            <div class="mb-3 space-y-1">
                                <div class="text-sm font-medium">"Rename category"</div>
                            </div>

                            <div class="space-y-2">
                                <div class="space-y-1">
                                    <Label class="text-xs">"New name"</Label>
                                    <Input bind_value=rename_value class="h-8 text-sm" />
                                </div>

                                <Show when=move || rename_error.get().is_some() fallback=|| ().into_view()>
                                    {move || rename_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:disabled=move || rename_loading.get()
                                        on:click=move |_| rename_open.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button
                                        size=ButtonSize::Sm
                                        attr:disabled=move || rename_loading.get()
                                        on:click=on_submit_rename
                                    >
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=move || rename_loading.get() fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            {move || if rename_loading.get() { "Saving..." } else { "Save" }}
                                        </span>
                                    </Button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>

                <Show when=move || delete_open.get() fallback=|| ().into_view()>
                    <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                        <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                            <div class="mb-3 space-y-1">
                                <div class="text-sm font-medium text-destructive">"Delete category"</div>
                                <div class="text-xs text-muted-foreground">
                                    "Prompts in this category are kept and become uncategorized. Type the category name to confirm."
                                </div>
                            </div>

                            <div class="space-y-2">
                                <div class="rounded-md border border-border bg-muted px-3 py-2 text-sm">
                                    {move || delete_cat_name.get()}
                                </div>

                                <div class="space-y-1">
                                    <Label class="text-xs">"Confirm name"</Label>
                                    <Input bind_value=delete_confirm class="h-8 text-sm" placeholder="Type name exactly" />
                                </div>

                                <Show when=move || delete_error.get().is_some() fallback=|| ().into_view()>
                                    {move || delete_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:disabled=move || delete_loading.get()
                                        on:click=move |_| delete_open.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        class="border-destructive/40 text-destructive"
                                        attr:disabled=move || delete_loading.get()
                                        on:click=on_submit_delete
                                    >
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=move || delete_loading.get() fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            {move || if delete_loading.get() { "Deleting..." } else { "Delete" }}
                                        </span>
                                    </Button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>

                <Show when=move || np_open.get() fallback=|| ().into_view()>
                    <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                        <div class="w-full max-w-md rounded-md border border-border bg-background p-4 shadow-lg">
                            <div class="mb-3 space-y-1">
                                <div class="text-sm font-medium">"New prompt"</div>
                            </div>

                            <div class="space-y-2">
                                <div class="space-y-1">
                                    <Label class="text-xs">"Title"</Label>
                                    <Input bind_value=np_title class="h-8 text-sm border-border bg-background" />
                                </div>
                                <div class="space-y-1">
                                    <Label class="text-xs">"Content"</Label>
                                    <Textarea bind_value=np_content rows=6 class="text-sm border-border bg-background" />
                                </div>
                                <div class="space-y-1">
                                    <Label class="text-xs">"Description (optional)"</Label>
                                    <Input bind_value=np_desc class="h-8 text-sm border-border bg-background" />
                                </div>
                                <div class="space-y-1">
                                    <Label class="text-xs">"Tags (comma-separated, optional)"</Label>
                                    <Input bind_value=np_tags placeholder="rust, cli" class="h-8 text-sm border-border bg-background" />
                                </div>

                                <label class="flex items-center gap-2 text-xs text-muted-foreground">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || np_favorite.get()
                                        on:change=move |_| np_favorite.update(|v| *v = !*v)
                                    />
                                    "Mark as favorite"
                                </label>

                                <div class="h-px w-full bg-border" />

                                {move || {
                                    let creating = picker.get().mode == PickerMode::CreatingNew;
                                    let select_variant = if creating {
                                        ButtonVariant::Outline
                                    } else {
                                        ButtonVariant::Accent
                                    };
                                    let create_variant = if creating {
                                        ButtonVariant::Accent
                                    } else {
                                        ButtonVariant::Outline
                                    };

                                    view! {
                                        <div class="flex items-center gap-2">
                                            <Button
                                                variant=select_variant
                                                size=ButtonSize::Sm
                                                on:click=move |_| {
                                                    picker.update(|p| p.back_to_select());
                                                    np_new_name.set(String::new());
                                                    np_new_desc.set(String::new());
                                                    np_new_parent.set(None);
                                                }
                                            >
                                                "Pick category"
                                            </Button>
                                            <Button
                                                variant=create_variant
                                                size=ButtonSize::Sm
                                                on:click=move |_| picker.update(|p| p.begin_create())
                                            >
                                                "Create category"
                                            </Button>
                                        </div>
                                    }
                                }}

                                <Show
                                    when=move || picker.get().mode == PickerMode::SelectingExisting
                                    fallback=move || view! {
                                        <div class="space-y-2">
                                            <div class="space-y-1">
                                                <Label class="text-xs">"Category name"</Label>
                                                <Input bind_value=np_new_name class="h-8 text-sm border-border bg-background" />
                                            </div>
                                            <div class="space-y-1">
                                                <Label class="text-xs">"Category description (optional)"</Label>
                                                <Input bind_value=np_new_desc class="h-8 text-sm border-border bg-background" />
                                            </div>
                                            <div class="space-y-1">
                                                <Label class="text-xs">"Nest under (optional)"</Label>
                                                <select
                                                    class=SELECT_CLASS
                                                    prop:value=move || np_new_parent.get().unwrap_or_default()
                                                    on:change=move |ev: web_sys::Event| {
                                                        np_new_parent.set(select_value(&ev));
                                                    }
                                                >
                                                    <option value="">"No parent (top level)"</option>
                                                    {move || {
                                                        flattened_options(&categories.get())
                                                            .into_iter()
                                                            .map(|(id, label)| view! { <option value=id>{label}</option> })
                                                            .collect_view()
                                                    }}
                                                </select>
                                            </div>
                                        </div>
                                    }
                                >
                                    <div class="space-y-2">
                                        <div class="space-y-1">
                                            <Label class="text-xs">"Category"</Label>
                                            <select
                                                class=SELECT_CLASS
                                                prop:value=move || picker.get().parent_id.unwrap_or_default()
                                                on:change=move |ev: web_sys::Event| {
                                                    let v = select_value(&ev);
                                                    picker.update(|p| p.select_parent(v));
                                                }
                                            >
                                                <option value="">"Uncategorized"</option>
                                                {move || {
                                                    flattened_options(&categories.get())
                                                        .into_iter()
                                                        .map(|(id, label)| view! { <option value=id>{label}</option> })
                                                        .collect_view()
                                                }}
                                            </select>
                                        </div>

                                        {move || {
                                            let p = picker.get();
                                            let Some(pid) = p.parent_id.clone() else {
                                                return ().into_any();
                                            };
                                            let cats = categories.get();
                                            let forest = build_forest(&cats);
                                            let kids = forest.children_of(&pid).to_vec();
                                            if kids.is_empty() {
                                                return ().into_any();
                                            }

                                            view! {
                                                <div class="space-y-1">
                                                    <Label class="text-xs">"Subcategory (optional)"</Label>
                                                    <select
                                                        class=SELECT_CLASS
                                                        prop:value=move || picker.get().child_id.unwrap_or_default()
                                                        on:change=move |ev: web_sys::Event| {
                                                            let v = select_value(&ev);
                                                            picker.update(|p| p.select_child(v));
                                                        }
                                                    >
                                                        <option value="">"None"</option>
                                                        {kids
                                                            .into_iter()
                                                            .map(|c| view! { <option value=c.id.clone()>{c.name.clone()}</option> })
                                                            .collect_view()}
                                                    </select>
                                                </div>
                                            }
                                            .into_any()
                                        }}
                                    </div>
                                </Show>

                                <Show when=move || np_error.get().is_some() fallback=|| ().into_view()>
                                    {move || np_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:disabled=move || np_loading.get()
                                        on:click=move |_| np_open.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button
                                        size=ButtonSize::Sm
                                        attr:disabled=move || np_loading.get()
                                        on:click=move |_| submit_new_prompt()
                                    >
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=move || np_loading.get() fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            {move || if np_loading.get() { "Creating..." } else { "Create" }}
                                        </span>
                                    </Button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>
            </div>
        </div>
    }
}

#[component]
pub fn LibraryPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let actions = expect_context::<CategoryUiActions>();

    let categories = app_state.0.categories;
    let prompts = app_state.0.prompts;
    let prompts_loading = app_state.0.prompts_loading;
    let prompts_error = app_state.0.prompts_error;
    let open_new_prompt = actions.open_new_prompt;

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between gap-3">
                <div class="space-y-1">
                    <h1 class="text-xl font-semibold">"Library"</h1>
                    <p class="text-xs text-muted-foreground">"All prompts, grouped by category."</p>
                </div>
                <Button size=ButtonSize::Sm on:click=move |_| open_new_prompt.run(None)>
                    "New prompt"
                </Button>
            </div>

            <Show when=move || prompts_error.get().is_some() fallback=|| ().into_view()>
                {move || prompts_error.get().map(|e| view! {
                    <Alert class="border-destructive/30">
                        <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                    </Alert>
                })}
            </Show>

            <Show
                when=move || !(prompts_loading.get() && prompts.get().is_empty())
                fallback=|| view! {
                    <div class="flex items-center gap-2 text-sm text-muted-foreground">
                        <Spinner />
                        "Loading prompts..."
                    </div>
                }
            >
                <div class="space-y-4">
                    {move || {
                        let cats = categories.get();
                        let ps = prompts.get();
                        let mut buckets = group_by_category(&ps, &cats);
                        let by_id: HashMap<String, Category> =
                            cats.iter().map(|c| (c.id.clone(), c.clone())).collect();

                        let mut sections: Vec<AnyView> = vec![];

                        for (id, _label) in flattened_options(&cats) {
                            let Some(cat) = by_id.get(&id) else { continue };
                            let items = buckets
                                .remove(&Bucket::Category(id.clone()))
                                .unwrap_or_default();

                            let cat_id_for_add = cat.id.clone();
                            let cat_id_for_link = cat.id.clone();
                            let name = cat.name.clone();
                            let description = cat.description.clone().unwrap_or_default();
                            let count = items.len();

                            sections.push(
                                view! {
                                    <Card>
                                        <CardHeader class="flex flex-row items-center justify-between p-3">
                                            <div class="min-w-0 space-y-0.5">
                                                <CardTitle class="truncate text-sm">
                                                    <a href=format!("/c/{}", cat_id_for_link) class="hover:underline">{name}</a>
                                                    <span class="ml-2 text-[11px] font-normal text-muted-foreground">
                                                        {count}
                                                    </span>
                                                </CardTitle>
                                                {
                                                let description = description.clone();
                                                view! {
                                                <Show when={
                                                    let has_desc = !description.is_empty();
                                                    move || has_desc
                                                } fallback=|| ().into_view()>
                                                    {
                                                    let description = description.clone();
                                                    view! {
                                                    <CardDescription class="truncate text-xs">
                                                        {description.clone()}
                                                    </CardDescription>
                                                    }
                                                    }
                                                </Show>
                                                }
                                                }
                                            </div>
                                            <Button
                                                variant=ButtonVariant::Ghost
                                                size=ButtonSize::Icon
                                                class="h-7 w-7"
                                                attr:title="New prompt here"
                                                on:click=move |_| open_new_prompt.run(Some(cat_id_for_add.clone()))
                                            >
                                                <span class="text-xs text-muted-foreground">"+"</span>
                                            </Button>
                                        </CardHeader>
                                        <CardContent class="p-3 pt-0">
                                            <Show when={
                                                let empty = items.is_empty();
                                                move || !empty
                                            } fallback=|| view! {
                                                <div class="text-xs text-muted-foreground">"No prompts."</div>
                                            }>
                                                <div class="space-y-1">
                                                    {items.iter().map(|p| prompt_row_view(p, None)).collect_view()}
                                                </div>
                                            </Show>
                                        </CardContent>
                                    </Card>
                                }
                                .into_any(),
                            );
                        }

                        let unfiled = buckets.remove(&Bucket::Uncategorized).unwrap_or_default();
                        let unfiled_count = unfiled.len();
                        sections.push(
                            view! {
                                <Card>
                                    <CardHeader class="flex flex-row items-center justify-between p-3">
                                        <CardTitle class="text-sm">
                                            "Uncategorized"
                                            <span class="ml-2 text-[11px] font-normal text-muted-foreground">
                                                {unfiled_count}
                                            </span>
                                        </CardTitle>
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Icon
                                            class="h-7 w-7"
                                            attr:title="New prompt"
                                            on:click=move |_| open_new_prompt.run(None)
                                        >
                                            <span class="text-xs text-muted-foreground">"+"</span>
                                        </Button>
                                    </CardHeader>
                                    <CardContent class="p-3 pt-0">
                                        <Show when={
                                            let empty = unfiled.is_empty();
                                            move || !empty
                                        } fallback=|| view! {
                                            <div class="text-xs text-muted-foreground">"No prompts."</div>
                                        }>
                                            <div class="space-y-1">
                                                {unfiled.iter().map(|p| prompt_row_view(p, None)).collect_view()}
                                            </div>
                                        </Show>
                                    </CardContent>
                                </Card>
                            }
                            .into_any(),
                        );

                        sections
                    }}
                </div>
            </Show>
        </div>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <AppLayout>
                {move || children.with_value(|c| c())}
            </AppLayout>
        </Show>
    }
}

#[component]
pub fn RootPage() -> impl IntoView {
    view! {
        <RootAuthed>
            <LibraryPage />
        </RootAuthed>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct CategoryRouteParams {
    pub category_id: Option<String>,
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct PromptRouteParams {
    pub prompt_id: Option<String>,
}

#[component]
pub fn CategoryPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let actions = expect_context::<CategoryUiActions>();
    let params = leptos_router::hooks::use_params::<CategoryRouteParams>();

    let categories = app_state.0.categories;
    let prompts = app_state.0.prompts;
    let current_category_id = app_state.0.current_category_id;
    let expanded_ids = app_state.0.expanded_category_ids;

    let open_new_prompt = actions.open_new_prompt;
    let open_create = actions.open_create;
    let open_rename = actions.open_rename;
    let open_delete = actions.open_delete;

    let cat_id = move || {
        params
            .get()
            .ok()
            .and_then(|p| p.category_id)
            .unwrap_or_default()
    };

    // Deep link: select the category and expand its ancestor chain so the
    // sidebar shows where we are. Re-runs when the catalog arrives.
    Effect::new(move |_| {
        let id = cat_id();
        if id.trim().is_empty() {
            return;
        }

        if current_category_id.get_untracked().as_deref() != Some(id.as_str()) {
            current_category_id.set(Some(id.clone()));
            persist_current_category(Some(&id));
        }

        let cats = categories.get();
        if cats.is_empty() {
            return;
        }

        let mut to_expand = ancestors_to_expand(&id, &cats);
        to_expand.insert(id.clone());

        let missing: Vec<String> = expanded_ids.with_untracked(|s| {
            to_expand.into_iter().filter(|e| !s.contains(e)).collect()
        });
        if !missing.is_empty() {
            expanded_ids.update(|s| s.extend(missing));
        }
    });

    view! {
        <div class="space-y-4">
            {move || {
                let id = cat_id();
                let cats = categories.get();
                let category = cats.iter().find(|c| c.id == id).cloned();

                let Some(category) = category else {
                    return view! {
                        <div class="text-sm text-muted-foreground">
                            {move || {
                                if app_state.0.catalog_loaded_once.get() {
                                    "Category not found."
                                } else {
                                    "Loading..."
                                }
                            }}
                        </div>
                    }
                    .into_any();
                };

                let ps = prompts.get();
                let items = group_by_category(&ps, &cats)
                    .remove(&Bucket::Category(category.id.clone()))
                    .unwrap_or_default();

                let forest = build_forest(&cats);
                let subcategories = forest.children_of(&category.id).to_vec();

                let name = category.name.clone();
                let description = category.description.clone().unwrap_or_default();
                let id_for_add = category.id.clone();
                let id_for_sub = category.id.clone();
                let id_for_rename = category.id.clone();
                let id_for_delete = category.id.clone();
                let name_for_rename = category.name.clone();
                let name_for_delete = category.name.clone();

                view! {
                    <div class="space-y-4">
                        <div class="flex items-start justify-between gap-3">
                            <div class="min-w-0 space-y-1">
                                <h1 class="truncate text-xl font-semibold">{name}</h1>
                                <Show when={
                                    let has_desc = !description.is_empty();
                                    move || has_desc
                                } fallback=|| ().into_view()>
                                    <p class="text-xs text-muted-foreground">{description.clone()}</p>
                                </Show>
                            </div>
                            <div class="flex shrink-0 items-center gap-2">
                                <Button
                                    size=ButtonSize::Sm
                                    on:click=move |_| open_new_prompt.run(Some(id_for_add.clone()))
                                >
                                    "New prompt"
                                </Button>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    on:click=move |_| open_create.run(Some(id_for_sub.clone()))
                                >
                                    "New subcategory"
                                </Button>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    on:click=move |_| {
                                        open_rename.run((id_for_rename.clone(), name_for_rename.clone()))
                                    }
                                >
                                    "Rename"
                                </Button>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    class="border-destructive/40 text-destructive"
                                    on:click=move |_| {
                                        open_delete.run((id_for_delete.clone(), name_for_delete.clone()))
                                    }
                                >
                                    "Delete"
                                </Button>
                            </div>
                        </div>

                        <Show when={
                            let has_subs = !subcategories.is_empty();
                            move || has_subs
                        } fallback=|| ().into_view()>
                            <div class="flex flex-wrap items-center gap-2">
                                {subcategories
                                    .iter()
                                    .map(|c| {
                                        let id = c.id.clone();
                                        let name = c.name.clone();
                                        view! {
                                            <a
                                                href=format!("/c/{}", id)
                                                class="rounded-md border border-border bg-surface px-2 py-1 text-xs transition-colors hover:bg-surface-hover"
                                            >
                                                {name}
                                            </a>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </Show>

                        <Show when={
                            let empty = items.is_empty();
                            move || !empty
                        } fallback=|| view! {
                            <div class="rounded-md border border-border bg-muted p-4 text-sm text-muted-foreground">
                                "No prompts in this category yet."
                            </div>
                        }>
                            <div class="space-y-1">
                                {items.iter().map(|p| prompt_row_view(p, None)).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

#[component]
pub fn PromptPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = StoredValue::new(CatalogStore::new(expect_context::<AppContext>()));
    let params = leptos_router::hooks::use_params::<PromptRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    let categories = app_state.0.categories;

    let prompt_id = move || {
        params
            .get()
            .ok()
            .and_then(|p| p.prompt_id)
            .unwrap_or_default()
    };
    let prompt_id_now = move || {
        params
            .get_untracked()
            .ok()
            .and_then(|p| p.prompt_id)
            .unwrap_or_default()
    };

    let loaded_id: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);

    let title: RwSignal<String> = RwSignal::new(String::new());
    let content: RwSignal<String> = RwSignal::new(String::new());
    let description: RwSignal<String> = RwSignal::new(String::new());
    let tags_text: RwSignal<String> = RwSignal::new(String::new());
    let is_favorite: RwSignal<bool> = RwSignal::new(false);
    // Select value; empty string means uncategorized.
    let category_value: RwSignal<String> = RwSignal::new(String::new());
    let created_at: RwSignal<String> = RwSignal::new(String::new());

    let save_loading: RwSignal<bool> = RwSignal::new(false);
    let save_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saved_notice: RwSignal<bool> = RwSignal::new(false);

    let delete_open: RwSignal<bool> = RwSignal::new(false);
    let delete_loading: RwSignal<bool> = RwSignal::new(false);
    let delete_error: RwSignal<Option<String>> = RwSignal::new(None);

    // Always fetch the full record; list payloads may be stale.
    Effect::new(move |_| {
        let id = prompt_id();
        if id.trim().is_empty() {
            return;
        }
        if loaded_id.get_untracked().as_deref() == Some(id.as_str()) {
            return;
        }
        loaded_id.set(Some(id.clone()));
        loading.set(true);
        load_error.set(None);

        let client = app_state.0.api_client.get_untracked();
        let s = store.get_value();
        spawn_local(async move {
            match client.get_prompt(&id).await {
                Ok(p) => {
                    title.set(p.title.clone());
                    content.set(p.content.clone());
                    description.set(p.description.clone().unwrap_or_default());
                    tags_text.set(p.tags.clone().unwrap_or_default().join(", "));
                    is_favorite.set(p.is_favorite);
                    category_value.set(p.category_ref().unwrap_or_default().to_string());
                    created_at.set(p.created_at.clone());
                    crate::storage::write_recent_prompt(&p.id, &p.title);
                }
                Err(e) => s.surface_error(&e, load_error),
            }
            loading.set(false);
        });
    });

    let on_save = move |_: web_sys::MouseEvent| {
        if save_loading.get_untracked() {
            return;
        }

        let id = prompt_id_now();
        if id.trim().is_empty() {
            return;
        }

        let title_val = title.get_untracked();
        if title_val.trim().is_empty() {
            save_error.set(Some("Title is required".to_string()));
            return;
        }
        let content_val = content.get_untracked();
        if content_val.trim().is_empty() {
            save_error.set(Some("Content is required".to_string()));
            return;
        }

        save_loading.set(true);
        save_error.set(None);
        saved_notice.set(false);

        let s = store.get_value();
        spawn_local(async move {
            let req = crate::api::UpdatePromptRequest {
                title: Some(title_val.trim().to_string()),
                content: Some(content_val),
                description: Some(description.get_untracked()),
                is_favorite: Some(is_favorite.get_untracked()),
                tags: Some(parse_tags(&tags_text.get_untracked()).unwrap_or_default()),
                category_id: Some(category_value.get_untracked()),
            };
            match s.update_prompt(&id, req).await {
                Ok(updated) => {
                    saved_notice.set(true);
                    crate::storage::write_recent_prompt(&updated.id, &updated.title);
                }
                Err(e) => s.surface_error(&e, save_error),
            }
            save_loading.set(false);
        });
    };

    let on_confirm_delete = move |_: web_sys::MouseEvent| {
        if delete_loading.get_untracked() {
            return;
        }

        let id = prompt_id_now();
        if id.trim().is_empty() {
            return;
        }

        delete_loading.set(true);
        delete_error.set(None);

        let s = store.get_value();
        spawn_local(async move {
            match s.delete_prompt(&id).await {
                Ok(_) => {
                    delete_open.set(false);
                    navigate.with_value(|nav| nav("/", Default::default()));
                }
                Err(e) => s.surface_error(&e, delete_error),
            }
            delete_loading.set(false);
        });
    };

    view! {
        <div class="space-y-4">
            <Show when=move || load_error.get().is_some() fallback=|| ().into_view()>
                {move || load_error.get().map(|e| view! {
                    <Alert class="border-destructive/30">
                        <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                    </Alert>
                })}
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex items-center gap-2 text-sm text-muted-foreground">
                        <Spinner />
                        "Loading prompt..."
                    </div>
                }
            >
                <div class="space-y-4">
                    <div class="flex items-start justify-between gap-3">
                        <div class="min-w-0 flex-1 space-y-1">
                            <Input
                                bind_value=title
                                class="h-9 text-base font-semibold"
                                placeholder="Prompt title"
                            />
                            <Show when=move || !created_at.get().is_empty() fallback=|| ().into_view()>
                                <p class="text-[11px] text-muted-foreground">
                                    {move || format!("Created {}", created_at.get())}
                                </p>
                            </Show>
                        </div>
                        <div class="flex shrink-0 items-center gap-2">
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Icon
                                class="h-8 w-8"
                                attr:title="Toggle favorite"
                                on:click=move |_| is_favorite.update(|v| *v = !*v)
                            >
                                <span class=move || {
                                    if is_favorite.get() {
                                        "text-primary"
                                    } else {
                                        "text-muted-foreground"
                                    }
                                }>
                                    {move || if is_favorite.get() { "★" } else { "☆" }}
                                </span>
                            </Button>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                class="border-destructive/40 text-destructive"
                                on:click=move |_| {
                                    delete_error.set(None);
                                    delete_open.set(true);
                                }
                            >
                                "Delete"
                            </Button>
                        </div>
                    </div>

                    <div class="space-y-1">
                        <Label class="text-xs">"Content"</Label>
                        <Textarea bind_value=content rows=12 class="font-mono text-sm" />
                    </div>

                    <div class="grid gap-3 sm:grid-cols-2">
                        <div class="space-y-1">
                            <Label class="text-xs">"Description"</Label>
                            <Input bind_value=description class="h-8 text-sm" />
                        </div>
                        <div class="space-y-1">
                            <Label class="text-xs">"Tags (comma-separated)"</Label>
                            <Input bind_value=tags_text placeholder="rust, cli" class="h-8 text-sm" />
                        </div>
                    </div>

                    <div class="space-y-1">
                        <Label class="text-xs">"Category"</Label>
                        <select
                            class=SELECT_CLASS
                            prop:value=move || category_value.get()
                            on:change=move |ev: web_sys::Event| {
                                category_value.set(select_value(&ev).unwrap_or_default());
                            }
                        >
                            <option value="">"Uncategorized"</option>
                            {move || {
                                flattened_options(&categories.get())
                                    .into_iter()
                                    .map(|(id, label)| view! { <option value=id>{label}</option> })
                                    .collect_view()
                            }}
                        </select>
                    </div>

                    <Show when=move || save_error.get().is_some() fallback=|| ().into_view()>
                        {move || save_error.get().map(|e| view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                            </Alert>
                        })}
                    </Show>

                    <div class="flex items-center gap-2">
                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=move || save_loading.get()
                            on:click=on_save
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || save_loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if save_loading.get() { "Saving..." } else { "Save" }}
                            </span>
                        </Button>
                        <Show when=move || saved_notice.get() fallback=|| ().into_view()>
                            <span class="text-xs text-muted-foreground">"Saved."</span>
                        </Show>
                    </div>
                </div>
            </Show>

            <Show when=move || delete_open.get() fallback=|| ().into_view()>
                <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                    <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                        <div class="mb-3 space-y-1">
                            <div class="text-sm font-medium text-destructive">"Delete prompt"</div>
                            <div class="text-xs text-muted-foreground">
                                "This cannot be undone."
                            </div>
                        </div>

                        <Show when=move || delete_error.get().is_some() fallback=|| ().into_view()>
                            {move || delete_error.get().map(|e| view! {
                                <Alert class="border-destructive/30">
                                    <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                </Alert>
                            })}
                        </Show>

                        <div class="flex items-center justify-end gap-2 pt-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:disabled=move || delete_loading.get()
                                on:click=move |_| delete_open.set(false)
                            >
                                "Cancel"
                            </Button>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                class="border-destructive/40 text-destructive"
                                attr:disabled=move || delete_loading.get()
                                on:click=on_confirm_delete
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || delete_loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if delete_loading.get() { "Deleting..." } else { "Delete" }}
                                </span>
                            </Button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
pub fn SearchPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = StoredValue::new(CatalogStore::new(expect_context::<AppContext>()));
    let query = use_query_map();

    let categories = app_state.0.categories;

    let q = move || query.get().get("q").unwrap_or_default();

    let results: RwSignal<Vec<Prompt>> = RwSignal::new(vec![]);
    let searching: RwSignal<bool> = RwSignal::new(false);
    let search_error: RwSignal<Option<String>> = RwSignal::new(None);
    let last_q: RwSignal<Option<String>> = RwSignal::new(None);

    // Server-side search on each query change. Results stay page-local and
    // never replace the cached prompt list.
    Effect::new(move |_| {
        let trimmed = q().trim().to_string();
        if last_q.get_untracked().as_deref() == Some(trimmed.as_str()) {
            return;
        }
        last_q.set(Some(trimmed.clone()));

        if trimmed.is_empty() {
            results.set(vec![]);
            return;
        }

        searching.set(true);
        search_error.set(None);

        let s = store.get_value();
        spawn_local(async move {
            match s.search_prompts(&trimmed).await {
                Ok(list) => results.set(list),
                Err(e) => s.surface_error(&e, search_error),
            }
            searching.set(false);
        });
    });

    view! {
        <div class="space-y-4">
            <div class="space-y-1">
                <h1 class="text-xl font-semibold">"Search"</h1>
                <p class="text-xs text-muted-foreground">{move || format!("q = {}", q())}</p>
            </div>

            <Show when=move || search_error.get().is_some() fallback=|| ().into_view()>
                {move || search_error.get().map(|e| view! {
                    <Alert class="border-destructive/30">
                        <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                    </Alert>
                })}
            </Show>

            <Show
                when=move || !q().trim().is_empty()
                fallback=|| view! {
                    <div class="rounded-md border border-border bg-muted p-4 text-sm text-muted-foreground">
                        "Type a query in the sidebar search box and press Enter."
                    </div>
                }
            >
                <Card>
                    <CardHeader class="p-3">
                        <CardTitle class="text-sm">"Prompts"</CardTitle>
                    </CardHeader>
                    <CardContent class="p-3 pt-0">
                        <Show
                            when=move || !results.get().is_empty()
                            fallback=move || view! {
                                <div class="text-sm text-muted-foreground">
                                    {move || if searching.get() { "Searching..." } else { "No matching prompts." }}
                                </div>
                            }
                        >
                            <div class="space-y-1">
                                {move || {
                                    let cats = categories.get();
                                    let by_id: HashMap<String, String> = cats
                                        .iter()
                                        .map(|c| (c.id.clone(), c.name.clone()))
                                        .collect();

                                    results
                                        .get()
                                        .iter()
                                        .map(|p| {
                                            let cat_name = p
                                                .category_ref()
                                                .and_then(|id| by_id.get(id).cloned());
                                            prompt_row_view(p, cat_name)
                                        })
                                        .collect_view()
                                }}
                            </div>
                        </Show>
                    </CardContent>
                </Card>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::flattened_options;
    use crate::models::Category;

    fn cat(id: &str, name: &str, parent: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            color: None,
            icon: None,
            parent_id: parent.map(str::to_string),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn options_are_preorder_with_indented_labels() {
        let cats = vec![
            cat("c1", "Work", None),
            cat("c2", "Personal", None),
            cat("c3", "Code", Some("c1")),
            cat("c4", "Reviews", Some("c3")),
        ];

        let opts = flattened_options(&cats);
        let ids: Vec<&str> = opts.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3", "c4", "c2"]);

        assert_eq!(opts[0].1, "Work");
        assert_eq!(opts[1].1, "— Code");
        assert_eq!(opts[2].1, "— — Reviews");
    }

    #[test]
    fn orphaned_categories_are_appended_flat() {
        let cats = vec![
            cat("c1", "Work", None),
            cat("a", "A", Some("b")),
            cat("b", "B", Some("a")),
            cat("d", "Dangling", Some("ghost")),
        ];

        let opts = flattened_options(&cats);
        let ids: Vec<&str> = opts.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "a", "b", "d"]);

        // Orphans carry no indentation even though their raw parent chain
        // suggests nesting.
        assert_eq!(opts[1].1, "A");
        assert_eq!(opts[2].1, "B");
        assert_eq!(opts[3].1, "Dangling");
    }

    #[test]
    fn empty_catalog_yields_no_options() {
        assert!(flattened_options(&[]).is_empty());
    }
}
