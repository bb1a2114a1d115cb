//! Canonical test configuration.

/// A complete, valid configuration relying on every default it can.
pub const SAMPLE: &str = r#"
[network]
rpc_url = "http://127.0.0.1:8545"

[fund]
hub = "0x1111111111111111111111111111111111111111"
accounting = "0x2222222222222222222222222222222222222222"
trading = "0x3333333333333333333333333333333333333333"

[exchange]
factory = "0x4444444444444444444444444444444444444444"
adapter = "0x5555555555555555555555555555555555555555"

[[tokens]]
symbol = "WETH"
address = "0x0101010101010101010101010101010101010101"
decimals = 18

[[tokens]]
symbol = "MLN"
address = "0x0202020202020202020202020202020202020202"
decimals = 18

[pair]
one = "WETH"
two = "MLN"
anchor = "WETH"

[strategy]

[gas]
feed_url = "http://127.0.0.1:9/gas"

[scheduler]

[logging]
level = "info"
format = "pretty"
"#;
