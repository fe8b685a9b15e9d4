use std::str::FromStr;

use crate::{error::HalError, model::hint::Hint};

/// 请求节点中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Hint(Hint),
    PowerProfile(i32),
    Interactive(bool),
    VrHal(bool),
}

fn parse_int(verb: &str, arg: Option<&str>) -> Result<i32, HalError> {
    let arg = arg.ok_or_else(|| HalError::Parse(format!("{verb} needs an argument")))?;
    arg.parse::<i32>()
        .map_err(|e| HalError::Parse(format!("{verb} {arg}: {e}")))
}

fn parse_flag(verb: &str, arg: Option<&str>) -> Result<bool, HalError> {
    match arg {
        Some("1") | Some("on") | Some("true") => Ok(true),
        Some("0") | Some("off") | Some("false") => Ok(false),
        Some(other) => Err(HalError::Parse(format!("{verb}: bad flag '{other}'"))),
        None => Err(HalError::Parse(format!("{verb} needs 0 or 1"))),
    }
}

impl FromStr for Request {
    type Err = HalError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };

        let request = match verb {
            "interaction" => Request::Hint(Hint::Interaction(
                arg.map(|_| parse_int(verb, arg)).transpose()?,
            )),
            "launch" => Request::Hint(Hint::Launch),
            "cpu_boost" => Request::Hint(Hint::CpuBoost(parse_int(verb, arg)?)),
            "video_encode" => Request::Hint(Hint::VideoEncode(arg.map(str::to_string))),
            "sustained_performance" => {
                Request::Hint(Hint::SustainedPerformance(Some(parse_flag(verb, arg)?)))
            }
            "vr_mode" => Request::Hint(Hint::VrMode(Some(parse_flag(verb, arg)?))),
            "set_profile" => Request::Hint(Hint::SetProfile(parse_int(verb, arg)?)),
            "power_profile" => Request::PowerProfile(parse_int(verb, arg)?),
            "interactive" => Request::Interactive(parse_flag(verb, arg)?),
            "vr_hal" => Request::VrHal(parse_flag(verb, arg)?),
            _ => return Err(HalError::Parse(format!("unknown request '{line}'"))),
        };

        Ok(request)
    }
}

/// 跳过空行与注释
pub fn parse_requests(content: &str) -> Vec<Result<Request, HalError>> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::parse)
        .collect()
}
