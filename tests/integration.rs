use cosmwasm_std::testing::MockApi;
use cosmwasm_std::{Addr, Coin, Empty, Uint128, Uint256};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use vrf_blackjack::msg::{ExecuteMsg, HouseResponse, InstantiateMsg, QueryMsg, TableResponse};
use vrf_blackjack::state::GameState;

const DENOM: &str = "utoken";

/// Stand-in for the randomness oracle. It remembers who asked and lets the
/// test push an answer back to that consumer.
mod mock_oracle {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdResult, Uint256, WasmMsg};
    use cw_storage_plus::{Item, Map};

    #[cw_serde]
    pub enum ExecuteMsg {
        RequestRandomWords {
            request_id: u64,
            num_words: u32,
            callback_gas_limit: u64,
        },
        Answer {
            request_id: u64,
            random_words: Vec<Uint256>,
        },
    }

    #[cw_serde]
    pub enum QueryMsg {
        NumWords { request_id: u64 },
    }

    const CONSUMER: Item<Addr> = Item::new("consumer");
    const NUM_WORDS: Map<u64, u32> = Map::new("num_words");

    pub fn instantiate(_deps: DepsMut, _env: Env, _info: MessageInfo, _msg: Empty) -> StdResult<Response> {
        Ok(Response::new())
    }

    pub fn execute(deps: DepsMut, _env: Env, info: MessageInfo, msg: ExecuteMsg) -> StdResult<Response> {
        match msg {
            ExecuteMsg::RequestRandomWords {
                request_id, num_words, ..
            } => {
                CONSUMER.save(deps.storage, &info.sender)?;
                NUM_WORDS.save(deps.storage, request_id, &num_words)?;
                Ok(Response::new())
            }
            ExecuteMsg::Answer {
                request_id,
                random_words,
            } => {
                let consumer = CONSUMER.load(deps.storage)?;
                Ok(Response::new().add_message(WasmMsg::Execute {
                    contract_addr: consumer.to_string(),
                    msg: to_json_binary(&vrf_blackjack::msg::ExecuteMsg::FulfillRandomWords {
                        request_id,
                        random_words,
                    })?,
                    funds: vec![],
                }))
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::NumWords { request_id } => to_json_binary(&NUM_WORDS.may_load(deps.storage, request_id)?),
        }
    }
}

struct Suite {
    app: App,
    admin: Addr,
    player: Addr,
    oracle: Addr,
    casino: Addr,
}

fn setup_with_bankroll(bankroll: u128) -> Suite {
    let api = MockApi::default();
    let admin = api.addr_make("admin");
    let player = api.addr_make("player");

    let mut app = App::new(|router, _api, storage| {
        router
            .bank
            .init_balance(storage, &admin, vec![Coin::new(10_000_000u128, DENOM)])
            .unwrap();
        router
            .bank
            .init_balance(storage, &player, vec![Coin::new(1_000_000u128, DENOM)])
            .unwrap();
    });

    let oracle_code = app.store_code(Box::new(ContractWrapper::new(
        mock_oracle::execute,
        mock_oracle::instantiate,
        mock_oracle::query,
    )));
    let oracle = app
        .instantiate_contract(oracle_code, admin.clone(), &Empty {}, &[], "oracle", None)
        .unwrap();

    let casino_code = app.store_code(Box::new(ContractWrapper::new(
        vrf_blackjack::contract::execute,
        vrf_blackjack::contract::instantiate,
        vrf_blackjack::contract::query,
    )));
    let funds = if bankroll == 0 {
        vec![]
    } else {
        vec![Coin::new(bankroll, DENOM)]
    };
    let casino = app
        .instantiate_contract(
            casino_code,
            admin.clone(),
            &InstantiateMsg {
                denom: DENOM.to_string(),
                min_bet: Uint128::new(10),
                max_bet: Uint128::new(10_000),
                oracle: oracle.to_string(),
                callback_gas_limit: 500_000,
                request_timeout_seconds: Some(600),
            },
            &funds,
            "vrf-blackjack",
            Some(admin.to_string()),
        )
        .unwrap();

    Suite {
        app,
        admin,
        player,
        oracle,
        casino,
    }
}

fn setup() -> Suite {
    setup_with_bankroll(1_000_000)
}

impl Suite {
    fn start(&mut self, wager: u128) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.player.clone(),
            self.casino.clone(),
            &ExecuteMsg::StartGame {},
            &[Coin::new(wager, DENOM)],
        ).map_err(anyhow::Error::msg)
    }

    fn act(&mut self, msg: ExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(self.player.clone(), self.casino.clone(), &msg, &[])
            .map_err(anyhow::Error::msg)
    }

    fn table(&self) -> TableResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.casino,
                &QueryMsg::GetTable {
                    player: self.player.to_string(),
                },
            )
            .unwrap()
    }

    fn pending_request(&self) -> u64 {
        self.table().pending_request_id.expect("no pending request")
    }

    fn requested_words(&self, request_id: u64) -> Option<u32> {
        self.app
            .wrap()
            .query_wasm_smart(&self.oracle, &mock_oracle::QueryMsg::NumWords { request_id })
            .unwrap()
    }

    /// Oracle answers the pending request.
    fn answer(&mut self, values: &[u64]) -> anyhow::Result<AppResponse> {
        let request_id = self.pending_request();
        self.answer_request(request_id, values)
    }

    fn answer_request(&mut self, request_id: u64, values: &[u64]) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.admin.clone(),
            self.oracle.clone(),
            &mock_oracle::ExecuteMsg::Answer {
                request_id,
                random_words: values.iter().map(|&v| Uint256::from(v)).collect(),
            },
            &[],
        ).map_err(anyhow::Error::msg)
    }

    fn balance(&self, addr: &Addr) -> Uint256 {
        self.app.wrap().query_balance(addr, DENOM).unwrap().amount
    }
}

fn has_event(response: &AppResponse, ty: &str) -> bool {
    response.events.iter().any(|e| e.ty == ty)
}

#[test]
fn test_winning_hand_pays_from_house() {
    let mut suite = setup();

    suite.start(100).unwrap();
    let request_id = suite.pending_request();
    assert_eq!(suite.requested_words(request_id), Some(3));
    assert_eq!(suite.balance(&suite.player), Uint256::from(999_900u128));

    let res = suite.answer(&[0, 4, 10, 0, 0, 0, 0, 0]).unwrap();
    assert!(has_event(&res, "wasm-game_started"));
    assert_eq!(suite.table().player_cards[..2], [1, 5]);

    suite.act(ExecuteMsg::Hit {}).unwrap();
    assert_eq!(suite.requested_words(suite.pending_request()), Some(1));
    suite.answer(&[4]).unwrap();
    assert_eq!(suite.table().player_score, 21);

    suite.act(ExecuteMsg::Stand {}).unwrap();
    assert_eq!(suite.requested_words(suite.pending_request()), Some(20));
    let res = suite.answer(&[6, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    assert!(has_event(&res, "wasm-player_win"));

    assert_eq!(suite.balance(&suite.player), Uint256::from(1_000_100u128));
    assert_eq!(suite.balance(&suite.casino), Uint256::from(999_900u128));

    let table = suite.table();
    assert_eq!(table.game_state, GameState::Idle);
    assert_eq!(table.player_cards, vec![0u8; 21]);
}

#[test]
fn test_losing_hand_keeps_wager_in_house() {
    let mut suite = setup();
    suite.start(100).unwrap();
    suite.answer(&[0, 1, 2, 0, 0, 0, 0, 0]).unwrap();
    suite.act(ExecuteMsg::Stand {}).unwrap();
    let res = suite.answer(&[0, 1, 2, 0, 0, 0, 0, 0]).unwrap();

    assert!(has_event(&res, "wasm-player_lose"));
    assert_eq!(suite.balance(&suite.player), Uint256::from(999_900u128));
    assert_eq!(suite.balance(&suite.casino), Uint256::from(1_000_100u128));
    assert_eq!(suite.table().game_state, GameState::Idle);
}

#[test]
fn test_push_returns_wager() {
    let mut suite = setup();
    suite.start(500).unwrap();
    suite.answer(&[9, 7, 9]).unwrap();
    suite.act(ExecuteMsg::Stand {}).unwrap();
    let res = suite.answer(&[7]).unwrap();

    assert!(has_event(&res, "wasm-player_draw"));
    assert_eq!(suite.balance(&suite.player), Uint256::from(1_000_000u128));
}

#[test]
fn test_surrender_and_play_again() {
    let mut suite = setup();
    suite.start(100).unwrap();
    suite.answer(&[1, 2, 9]).unwrap();
    suite.act(ExecuteMsg::Surrender {}).unwrap();
    assert_eq!(suite.balance(&suite.player), Uint256::from(999_950u128));

    suite.start(100).unwrap();
    assert_eq!(suite.table().game_state, GameState::AwaitingRandomness);
}

#[test]
fn test_player_cannot_fulfill_own_request() {
    let mut suite = setup();
    suite.start(100).unwrap();
    let request_id = suite.pending_request();

    let err = suite
        .act(ExecuteMsg::FulfillRandomWords {
            request_id,
            random_words: vec![Uint256::zero(); 3],
        })
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Unauthorized"));
    assert_eq!(suite.table().game_state, GameState::AwaitingRandomness);
}

#[test]
fn test_short_answer_reverts_and_can_be_retried() {
    let mut suite = setup();
    suite.start(100).unwrap();

    let err = suite.answer(&[0]).unwrap_err();
    assert!(err.root_cause().to_string().contains("Insufficient entropy"));
    assert_eq!(suite.table().game_state, GameState::AwaitingRandomness);

    suite.answer(&[0, 1, 2]).unwrap();
    let table = suite.table();
    assert_eq!(table.game_state, GameState::InProgress);
    assert_eq!(table.player_card_count, 2);
}

#[test]
fn test_stuck_request_refund_after_timeout() {
    let mut suite = setup();
    suite.start(100).unwrap();
    let request_id = suite.pending_request();

    assert!(suite.act(ExecuteMsg::CancelStuckRequest {}).is_err());

    suite.app.update_block(|block| {
        block.time = block.time.plus_seconds(600);
        block.height += 100;
    });
    let res = suite.act(ExecuteMsg::CancelStuckRequest {}).unwrap();
    assert!(has_event(&res, "wasm-request_cancelled"));
    assert_eq!(suite.balance(&suite.player), Uint256::from(1_000_000u128));

    // A late answer is dropped without touching the table.
    let res = suite.answer_request(request_id, &[0, 1, 2]).unwrap();
    assert!(res
        .events
        .iter()
        .flat_map(|e| e.attributes.iter())
        .any(|a| a.value == "fulfillment_ignored"));
    assert_eq!(suite.table().game_state, GameState::Idle);
    assert_eq!(suite.balance(&suite.player), Uint256::from(1_000_000u128));
}

#[test]
fn test_house_withdraw_leaves_liability_covered() {
    let mut suite = setup();
    suite.start(1_000).unwrap();

    let house: HouseResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&suite.casino, &QueryMsg::GetHouse {})
        .unwrap();
    assert_eq!(house.balance, Uint128::new(1_001_000));
    assert_eq!(house.outstanding_liability, Uint128::new(2_000));
    assert_eq!(house.available, Uint128::new(999_000));

    suite
        .app
        .execute_contract(
            suite.admin.clone(),
            suite.casino.clone(),
            &ExecuteMsg::WithdrawHouse { amount: None },
            &[],
        )
        .unwrap();
    assert_eq!(suite.balance(&suite.casino), Uint256::from(2_000u128));

    // Natural on the deal: the reserved liability pays it out.
    suite.answer(&[0, 12, 13]).unwrap();
    assert_eq!(suite.balance(&suite.player), Uint256::from(1_001_000u128));
    assert_eq!(suite.balance(&suite.casino), Uint256::zero());
}

#[test]
fn test_empty_house_refuses_games() {
    let mut suite = setup_with_bankroll(0);
    let err = suite.start(100).unwrap_err();
    assert!(err.root_cause().to_string().contains("House cannot cover"));
    assert_eq!(suite.balance(&suite.player), Uint256::from(1_000_000u128));

    suite
        .app
        .execute_contract(
            suite.admin.clone(),
            suite.casino.clone(),
            &ExecuteMsg::FundHouse {},
            &[Coin::new(100u128, DENOM)],
        )
        .unwrap();
    suite.start(100).unwrap();
}

#[test]
fn test_failed_payout_leaves_table_parked() {
    let mut suite = setup();
    suite.start(100).unwrap();
    suite.answer(&[1, 2, 9]).unwrap();
    suite.act(ExecuteMsg::Stand {}).unwrap();
    let request_id = suite.pending_request();

    let casino = suite.casino.clone();
    suite.app.init_modules(|router, _api, storage| {
        router.bank.init_balance(storage, &casino, vec![]).unwrap();
    });

    // Dealer busts, but the house can no longer send the winnings.
    assert!(suite.answer(&[5, 9]).is_err());
    let table = suite.table();
    assert_eq!(table.game_state, GameState::AwaitingRandomness);
    assert_eq!(table.pending_request_id, Some(request_id));
    assert_eq!(table.wager, Uint128::new(100));
    assert_eq!(table.dealer_card_count, 1);
    assert_eq!(suite.balance(&suite.player), Uint256::from(999_900u128));

    suite.app.init_modules(|router, _api, storage| {
        router
            .bank
            .init_balance(storage, &casino, vec![Coin::new(1_000u128, DENOM)])
            .unwrap();
    });
    let res = suite.answer(&[5, 9]).unwrap();
    assert!(has_event(&res, "wasm-player_win"));
    assert_eq!(suite.balance(&suite.player), Uint256::from(1_000_100u128));
    assert_eq!(suite.table().game_state, GameState::Idle);
}
