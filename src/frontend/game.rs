use gloo::timers::callback::Interval;
use log::{error, info};
use serde_json::Value;
use yew::prelude::*;

use chesstempo::router::Params;
use chesstempo::{BrowserTransport, GameClient, GameState, Turn};

use crate::app::link_to;
use crate::board::ChessBoard;

/// How often the state is refetched while the game is running.
const POLL_MILLIS: u32 = 1_000;

pub fn page(params: &Params, onnavigate: &Callback<String>) -> Html {
    let id = params.get("id").cloned().unwrap_or_default();
    let key = id.clone();
    html! { <GameView key={key} id={id} onnavigate={onnavigate.clone()} /> }
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: String,
    pub onnavigate: Callback<String>,
}

pub enum Msg {
    Refresh,
    /// Fetch result tagged with the sequence number of its request.
    Fetched(u64, chesstempo::Result<GameState>),
    Move(String, String),
    Moved(chesstempo::Result<Option<Value>>),
    Resign,
    Resigned(chesstempo::Result<Value>),
}

pub struct GameView {
    client: GameClient<BrowserTransport>,
    state: Option<GameState>,
    error: Option<String>,
    /// Sequence number of the last fetch sent and of the last one applied.
    /// Responses may come back out of order; older ones are dropped.
    requested: u64,
    applied: u64,
    poll: Option<Interval>,
}

impl Component for GameView {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Refresh);
        let link = ctx.link().clone();
        let poll = Interval::new(POLL_MILLIS, move || link.send_message(Msg::Refresh));

        Self {
            client: GameClient::new(BrowserTransport),
            state: None,
            error: None,
            requested: 0,
            applied: 0,
            poll: Some(poll),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let id = ctx.props().id.clone();
        match msg {
            Msg::Refresh => {
                self.requested += 1;
                let seq = self.requested;
                let client = self.client.clone();
                ctx.link()
                    .send_future(async move { Msg::Fetched(seq, client.fetch_game(&id).await) });
                false
            }
            Msg::Fetched(seq, _) if seq <= self.applied => false,
            Msg::Fetched(seq, Ok(state)) => {
                self.applied = seq;
                if state.is_over() && self.poll.take().is_some() {
                    info!("game {} is over: {:?}", id, state.outcome);
                }
                self.state = Some(state);
                self.error = None;
                true
            }
            Msg::Fetched(seq, Err(e)) => {
                self.applied = seq;
                error!("Failed to fetch game {}: {}", id, e);
                self.error = Some(format!("Could not load the game: {}", e));
                true
            }
            Msg::Move(orig, dest) => {
                let client = self.client.clone();
                ctx.link().send_future(async move {
                    Msg::Moved(client.move_game(&id, &orig, &dest).await)
                });
                false
            }
            Msg::Moved(result) => {
                if let Err(e) = result {
                    error!("Move rejected in game {}: {}", id, e);
                    self.error = Some(format!("Move failed: {}", e));
                }
                ctx.link().send_message(Msg::Refresh);
                true
            }
            Msg::Resign => {
                let client = self.client.clone();
                ctx.link()
                    .send_future(async move { Msg::Resigned(client.resign_game(&id).await) });
                false
            }
            Msg::Resigned(result) => {
                if let Err(e) = result {
                    error!("Failed to resign game {}: {}", id, e);
                    self.error = Some(format!("Could not resign: {}", e));
                }
                ctx.link().send_message(Msg::Refresh);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onmove = ctx.link().callback(|(orig, dest): (String, String)| Msg::Move(orig, dest));
        let onresign = ctx.link().callback(|_: MouseEvent| Msg::Resign);

        let Some(state) = &self.state else {
            return html! {
                <div>
                    { self.render_error() }
                    <p>{"Loading game "}{&ctx.props().id}{"..."}</p>
                </div>
            };
        };

        let playable = !state.is_over() && state.is_users_turn();
        let valid_moves = if playable {
            state.valid_moves.clone().unwrap_or_default()
        } else {
            Vec::new()
        };
        let flipped = state.color.as_deref() == Some("Black");

        html! {
            <div>
                { self.render_error() }
                <div class="flex flex-col md:flex-row gap-8">
                    <div class="flex-1">
                        <ChessBoard
                            fen={state.fen.clone().unwrap_or_default()}
                            valid_moves={valid_moves}
                            flipped={flipped}
                            onmove={onmove}
                        />
                    </div>

                    <div class="flex-1 p-4 bg-gray-100 rounded-lg">
                        <h2 class="text-2xl font-bold mb-4">{"Game "}{&ctx.props().id}</h2>

                        <div class="mb-4">
                            if state.is_over() {
                                <div class="text-lg font-semibold text-red-600">
                                    {"Game Over"}
                                    if let Some(outcome) = &state.outcome {
                                        <span class="ml-2">{"Outcome: "}{outcome}</span>
                                    }
                                </div>
                            } else {
                                <div class="text-lg font-semibold text-green-600">
                                    { match state.turn {
                                        Some(Turn::User) => "Your move",
                                        Some(Turn::Machine) => "Machine is thinking...",
                                        None => "Game in progress",
                                    } }
                                </div>
                            }
                        </div>

                        if let Some(color) = &state.color {
                            <div class="mb-4">{"You play "}{color}</div>
                        }

                        if playable {
                            if let Some(moves) = &state.valid_moves {
                                <div class="mb-4">
                                    <h3 class="text-lg font-semibold mb-2">{"Legal moves"}</h3>
                                    <div class="p-2 bg-white rounded font-mono text-sm">
                                        { moves.join(" ") }
                                    </div>
                                </div>
                            }
                        }

                        <div class="mt-6 flex gap-4">
                            if !state.is_over() {
                                <button
                                    class="bg-red-500 hover:bg-red-700 text-white font-bold py-2 px-4 rounded"
                                    onclick={onresign}
                                >
                                    {"Resign"}
                                </button>
                            }
                            <a
                                class="bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded"
                                href="/"
                                onclick={link_to(&ctx.props().onnavigate, "/")}
                            >
                                {"Lobby"}
                            </a>
                        </div>
                    </div>
                </div>
            </div>
        }
    }
}

impl GameView {
    fn render_error(&self) -> Html {
        match &self.error {
            Some(error) => html! {
                <div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4">
                    {error}
                </div>
            },
            None => html! {},
        }
    }
}
