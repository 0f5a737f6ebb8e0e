//! Indicator summary prompt.

use trading_indicators::IndicatorSnapshot;

use crate::ChatMessage;

/// Instruction restricting the reply to one action plus a rationale.
pub const SYSTEM_PROMPT: &str = "You are a technical analyst specialised in crypto markets. \
Analyse the indicators and answer only LONG, SHORT or HOLD, followed by the reason. \
You may add 'Confidence: <number>'.";

fn value(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

/// Render the latest indicator values as a plain-text summary.
pub fn render_prompt(snapshot: &IndicatorSnapshot, pair: &str) -> String {
    let macd = snapshot.macd;
    let bands = snapshot.bollinger;

    format!(
        "Technical analysis - {pair}

Current price: {close:.2}

Indicators:
- RSI: {rsi}
- MACD: {macd_line}
- MACD Signal: {macd_signal}
- MACD Histogram: {histogram}
- EMA short: {ema_short}
- EMA long: {ema_long}
- BB Upper: {upper}
- BB Middle: {middle}
- BB Lower: {lower}
- Volume: {volume:.2}
- Volume SMA: {volume_sma}
- ATR: {atr}

Based on these indicators, what is your recommendation? LONG, SHORT or HOLD?",
        close = snapshot.close,
        rsi = value(snapshot.rsi, 2),
        macd_line = value(macd.map(|m| m.macd), 4),
        macd_signal = value(macd.map(|m| m.signal), 4),
        histogram = value(macd.map(|m| m.histogram), 4),
        ema_short = value(snapshot.ema_short, 2),
        ema_long = value(snapshot.ema_long, 2),
        upper = value(bands.map(|b| b.upper), 2),
        middle = value(bands.map(|b| b.middle), 2),
        lower = value(bands.map(|b| b.lower), 2),
        volume = snapshot.volume,
        volume_sma = value(snapshot.volume_sma, 2),
        atr = value(snapshot.atr, 4),
    )
}

/// System instruction followed by the rendered summary.
pub fn build_messages(snapshot: &IndicatorSnapshot, pair: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(render_prompt(snapshot, pair)),
    ]
}
