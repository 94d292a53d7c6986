use maud::{DOCTYPE, Markup, html};

use crate::entities::{movie, user};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn users_page(users: &[user::Model], notice: Option<&str>) -> String {
    page(
        "MoviWeb",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    h1 class="text-3xl font-bold text-gray-900" { "MoviWeb" }
                    p class="mt-2 text-gray-600" { "Everyone's favorite movies, in one place." }

                    (notice_banner(notice))

                    div class="mt-8 bg-white shadow rounded-lg p-8" {
                        h2 class="text-xl font-semibold text-gray-900" { "Users" }
                        @if users.is_empty() {
                            p class="mt-4 text-gray-500" { "No users yet." }
                        } @else {
                            ul class="mt-4 divide-y divide-gray-100" {
                                @for user in users {
                                    li class="py-2" {
                                        a class="text-blue-600 hover:text-blue-800" href=(movies_path(user.id)) { (user.name) }
                                    }
                                }
                            }
                        }

                        form class="mt-8 flex gap-3" method="post" action="/users" {
                            input class=(INPUT_CLASS) name="name" id="name" placeholder="New user name" maxlength="100" required;
                            button class=(BUTTON_CLASS) type="submit" { "Add" }
                        }
                    }
                }
            }
        },
    )
}

pub fn movies_page(user: &user::Model, movies: &[movie::Model], notice: Option<&str>) -> String {
    page(
        &format!("{} · MoviWeb", user.name),
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-10" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { (user.name) "'s favorites" }
                            p class="mt-2 text-gray-600" { (movies.len()) " movies" }
                        }
                        a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "All users" }
                    }

                    (notice_banner(notice))

                    form class="mt-8 flex gap-3" method="post" action=(format!("/users/{}/add_movie", user.id)) {
                        input class=(INPUT_CLASS) name="title" placeholder="Movie title" required;
                        button class=(BUTTON_CLASS) type="submit" { "Add movie" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No favorites yet." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for movie in movies {
                                (movie_card(user.id, movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(title: &str, message: &str) -> String {
    page(
        title,
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (title) }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

pub fn movies_path(user_id: i32) -> String {
    format!("/users/{user_id}/movies")
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn notice_banner(notice: Option<&str>) -> Markup {
    html! {
        @if let Some(notice) = notice {
            div class="mt-6 rounded-md border border-blue-200 bg-blue-50 px-4 py-3 text-sm text-blue-800" role="status" {
                (notice)
            }
        }
    }
}

fn movie_card(user_id: i32, movie: &movie::Model) -> Markup {
    let base = format!("/users/{user_id}/movies/{}", movie.id);

    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if let Some(poster) = &movie.poster_url {
                img class="w-24 rounded" src=(poster) alt=(movie.name);
            }
            div class="flex-1" {
                h2 class="text-xl font-semibold text-gray-900" {
                    (movie.name)
                    span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                }
                p class="mt-1 text-sm text-gray-500" { "Directed by " (movie.director) }

                div class="mt-4 flex flex-wrap items-center gap-3" {
                    form class="flex gap-2" method="post" action=(format!("{base}/update")) {
                        input class=(INPUT_CLASS) name="title" value=(movie.name) required;
                        button class="rounded-md border border-gray-300 px-3 py-2 text-sm hover:bg-gray-50" type="submit" { "Rename" }
                    }
                    form method="post" action=(format!("{base}/delete")) {
                        button class="rounded-md px-3 py-2 text-sm text-red-600 hover:text-red-800" type="submit" { "Remove" }
                    }
                }
            }
        }
    }
}
