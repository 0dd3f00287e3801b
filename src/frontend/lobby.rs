use log::error;
use yew::prelude::*;

use chesstempo::router::Params;
use chesstempo::{BrowserTransport, Color, GameClient, GameIdentifier};

use crate::app::link_to;

pub fn page(_params: &Params, onnavigate: &Callback<String>) -> Html {
    html! { <LobbyView onnavigate={onnavigate.clone()} /> }
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub onnavigate: Callback<String>,
}

pub enum Msg {
    Refresh,
    Loaded(chesstempo::Result<Vec<GameIdentifier>>),
    Start(Option<Color>),
    Started(chesstempo::Result<GameIdentifier>),
}

pub struct LobbyView {
    client: GameClient<BrowserTransport>,
    games: Option<Vec<GameIdentifier>>,
    starting: bool,
    error: Option<String>,
}

impl Component for LobbyView {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Refresh);
        Self {
            client: GameClient::new(BrowserTransport),
            games: None,
            starting: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Refresh => {
                let client = self.client.clone();
                ctx.link()
                    .send_future(async move { Msg::Loaded(client.list_games().await) });
                false
            }
            Msg::Loaded(Ok(games)) => {
                self.games = Some(games);
                self.error = None;
                true
            }
            Msg::Loaded(Err(e)) => {
                error!("Failed to list games: {}", e);
                self.error = Some(format!("Could not load the games: {}", e));
                true
            }
            Msg::Start(color) => {
                if self.starting {
                    return false;
                }
                self.starting = true;
                let client = self.client.clone();
                ctx.link()
                    .send_future(async move { Msg::Started(client.start_game(color, None).await) });
                true
            }
            Msg::Started(Ok(id)) => {
                self.starting = false;
                ctx.props().onnavigate.emit(format!("/game/{}", id));
                false
            }
            Msg::Started(Err(e)) => {
                error!("Failed to start game: {}", e);
                self.starting = false;
                self.error = Some(format!("Could not start a game: {}", e));
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onnavigate = &ctx.props().onnavigate;
        let start = |color: Option<Color>| ctx.link().callback(move |_: MouseEvent| Msg::Start(color));
        let button = "bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded disabled:opacity-50";

        html! {
            <div class="p-4 bg-gray-100 rounded-lg">
                if let Some(error) = &self.error {
                    <div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4">
                        {error}
                    </div>
                }

                <h2 class="text-2xl font-bold mb-4">{"New game"}</h2>
                <div class="flex gap-4 mb-8">
                    <button class={button} disabled={self.starting} onclick={start(Some(Color::White))}>
                        {"Play white"}
                    </button>
                    <button class={button} disabled={self.starting} onclick={start(Some(Color::Black))}>
                        {"Play black"}
                    </button>
                    <button class={button} disabled={self.starting} onclick={start(None)}>
                        {"Random color"}
                    </button>
                </div>

                <h2 class="text-2xl font-bold mb-4">{"Games"}</h2>
                {
                    match &self.games {
                        None => html! { <p>{"Loading..."}</p> },
                        Some(games) if games.is_empty() => html! { <p>{"No games yet."}</p> },
                        Some(games) => html! {
                            <ul class="list-disc pl-6">
                                { for games.iter().map(|id| {
                                    let path = format!("/game/{}", id);
                                    html! {
                                        <li key={id.clone()}>
                                            <a href={path.clone()} onclick={link_to(onnavigate, &path)}>{id}</a>
                                        </li>
                                    }
                                }) }
                            </ul>
                        },
                    }
                }
                <button
                    class="mt-4 underline"
                    onclick={ctx.link().callback(|_: MouseEvent| Msg::Refresh)}
                >
                    {"Refresh"}
                </button>
            </div>
        }
    }
}
