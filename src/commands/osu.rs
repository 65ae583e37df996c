//! osu! commands: `!profile`, `!stats`, and the beatmap-link sniffer.

use std::sync::OnceLock;

use chrono::{Duration, NaiveDateTime, Utc};
use regex::Regex;

use crate::api::osu::{Beatmap, BeatmapRef, OsuClient, OsuUser, Score};
use crate::dispatch::MessageCtx;
use crate::error::Result;
use crate::state::BotState;
use crate::util::{fmt_duration, group_thousands, pretty_date};

const NOT_ASSOCIATED: &str =
    "You are not associated with any osu! user 👎 use `!profile -m <user>` to set.";

/// `!profile [-m | --me] <user> [*tag]` - link to a profile, optionally
/// associating the sender with an osu! account first.
pub async fn profile(
    state: &BotState,
    osu: &OsuClient,
    ctx: &MessageCtx,
    args: &[String],
) -> Result<Option<String>> {
    let mut append = String::new();
    let has_tag = args.len() > 1 && args.last().is_some_and(|a| a.starts_with('*'));

    if has_tag {
        append.push_str("#_");
        let reference = args.last().unwrap().replace('*', "");
        let reference = if reference.contains("ranks") || reference.contains("performance") {
            "leader".to_string()
        } else if reference == "kudosu" {
            "kudos".to_string()
        } else {
            reference
        };
        append.push_str(&reference);
    }
    let tag_offset = usize::from(has_tag);

    let mut reply: Option<String> = None;

    if (args.len() > 1 && !has_tag) || args.len() > 2 {
        let mut user = args[1..args.len() - tag_offset].join(" ");

        if args[1] == "-m" || args[1] == "--me" {
            if args.len() > 2 {
                user = args[2..args.len() - tag_offset].join(" ");

                if osu.enabled() {
                    user = match osu.get_user_id(&user).await? {
                        Some(id) => id,
                        None => return Ok(Some("This user does not exist.".to_string())),
                    };
                }

                let mut osu_users = state.osu_users.lock().await;
                osu_users.set(&ctx.author_id, user.clone())?;
                append.push_str("\n*osu! user associated with this account*");
            } else {
                let mut osu_users = state.osu_users.lock().await;
                let removed = osu_users.remove(&ctx.author_id)?;
                reply = Some(if removed.is_some() {
                    "*Removed association with osu! user.*".to_string()
                } else {
                    "Please use `!profile -m <user>`".to_string()
                });
            }
        }

        if reply.is_none() {
            reply = Some(profile_link(&user, &append));
        }
    } else {
        let osu_users = state.osu_users.lock().await;
        reply = Some(match osu_users.get(&ctx.author_id) {
            Some(user) => profile_link(user, &append),
            None => NOT_ASSOCIATED.to_string(),
        });
    }

    Ok(reply)
}

/// `!stats <user>` - performance summary for a user.
pub async fn stats(
    state: &BotState,
    osu: &OsuClient,
    ctx: &MessageCtx,
    args: &[String],
) -> Result<Option<String>> {
    let user = if args.len() > 1 {
        Some(args[1..].join(" "))
    } else {
        state.osu_users.lock().await.get(&ctx.author_id).cloned()
    };

    Ok(Some(match user {
        Some(user) => user_stats(osu, &user).await?,
        None => NOT_ASSOCIATED.to_string(),
    }))
}

async fn user_stats(osu: &OsuClient, user: &str) -> Result<String> {
    if !osu.enabled() {
        return Ok("This command is disabled. 👎".to_string());
    }

    Ok(match osu.get_user(user).await? {
        Some(user) => format_stats(&user),
        None => "No such user 👎".to_string(),
    })
}

fn profile_link(user: &str, append: &str) -> String {
    format!("https://osu.ppy.sh/u/{}{}", user.replace(' ', "%20"), append)
}

fn format_stats(user: &OsuUser) -> String {
    let accuracy: f64 = user.accuracy.parse().unwrap_or(0.0);
    format!(
        "**Stats for {username}** / https://osu.ppy.sh/u/{user_id} ```\n\
         Performance: {pp}pp (#{rank}) /{country} #{country_rank}\n\
         Accuracy:    {accuracy:.6} %\n\
         \x20            {ss} SS {s} S {a} A\n\
         Playcount:   {playcount}```",
        username = user.username,
        user_id = user.user_id,
        pp = user.pp_raw,
        rank = user.pp_rank,
        country = user.country,
        country_rank = user.pp_country_rank,
        accuracy = accuracy,
        ss = user.count_rank_ss,
        s = user.count_rank_s,
        a = user.count_rank_a,
        playcount = user.playcount,
    )
}

/// Beatmap references in a message, deduplicated in order of appearance.
pub fn maps_in(args: &[String]) -> Vec<BeatmapRef> {
    static MAP_RE: OnceLock<Regex> = OnceLock::new();
    let re = MAP_RE.get_or_init(|| Regex::new(r"osu\.ppy\.sh/(b|s)/(\d+)").unwrap());

    let mut maps = Vec::new();
    for arg in args {
        for captures in re.captures_iter(arg) {
            let id = captures[2].to_string();
            let map = match &captures[1] {
                "b" => BeatmapRef::Difficulty(id),
                _ => BeatmapRef::Set(id),
            };
            if !maps.contains(&map) {
                maps.push(map);
            }
        }
    }
    maps
}

/// Info for every referenced map, joined by blank lines.
pub async fn map_info(osu: &OsuClient, maps: &[BeatmapRef]) -> Result<String> {
    let mut parts = Vec::new();
    for map in maps {
        let text = single_map(osu, map).await?;
        if !text.is_empty() {
            parts.push(text);
        }
    }
    Ok(parts.join("\n\n"))
}

async fn single_map(osu: &OsuClient, map: &BeatmapRef) -> Result<String> {
    if !osu.enabled() {
        return Ok("This command is disabled 👎".to_string());
    }

    let beatmap = match osu.get_beatmap(map).await? {
        Some(beatmap) => beatmap,
        None => return Ok(String::new()),
    };

    Ok(match map {
        BeatmapRef::Set(_) => format_mapset(&beatmap),
        BeatmapRef::Difficulty(id) => {
            // Only ranked maps carry a scoreboard.
            let ranked = beatmap.approved.parse::<i64>().unwrap_or(0) > 0;
            let top = if ranked {
                osu.get_top_score(id).await?
            } else {
                None
            };
            format_difficulty(&beatmap, top.as_ref(), Utc::now())
        }
    })
}

fn format_mapset(map: &Beatmap) -> String {
    format!(
        "{artist} - {title} // {creator}```\n\
         Length: {length} BPM: {bpm}\n\
         Favourites: {favourites}```",
        artist = map.artist,
        title = map.title,
        creator = map.creator,
        length = fmt_duration(map.total_length.parse().unwrap_or(0)),
        bpm = map.bpm,
        favourites = map.favourite_count,
    )
}

fn format_difficulty(
    map: &Beatmap,
    top: Option<&Score>,
    now: chrono::DateTime<Utc>,
) -> String {
    let stars: f64 = map.difficultyrating.parse().unwrap_or(0.0);
    let mut out = format!(
        "{artist} - {title} // {creator} [{version}]```\n\
         Length: {length} ({drain} drain) BPM: {bpm} Max combo: {combo}\n\
         \x20   CS: {cs} AR: {ar} OD: {od} HP: {hp} Stars: {stars:.2}\n\
         Favourites: {favourites} / Success Rate: {passes}/{plays}```",
        artist = map.artist,
        title = map.title,
        creator = map.creator,
        version = map.version,
        length = fmt_duration(map.total_length.parse().unwrap_or(0)),
        drain = fmt_duration(map.hit_length.parse().unwrap_or(0)),
        bpm = map.bpm,
        combo = map.max_combo.as_deref().unwrap_or("0"),
        cs = map.diff_size,
        ar = map.diff_approach,
        od = map.diff_overall,
        hp = map.diff_drain,
        stars = stars,
        favourites = map.favourite_count,
        passes = map.passcount,
        plays = map.playcount,
    );

    if let Some(score) = top {
        let points = group_thousands(score.score.parse().unwrap_or(0));
        let pp = match score.pp.as_deref() {
            Some(pp) if !pp.is_empty() => format!("{}pp", pp),
            _ => "0pp".to_string(),
        };
        out.push_str(&format!(
            "\n{username} is in the lead! ({date})```\n\
             Score: {points} / {pp}\n\
             Combo: {combo}x / Misses: {misses}\n\
             \x20      {c300}x300 / {c100}x100 / {c50}x50```",
            username = score.username,
            date = score_date(&score.date, now),
            points = points,
            pp = pp,
            combo = score.maxcombo,
            misses = score.countmiss,
            c300 = score.count300,
            c100 = score.count100,
            c50 = score.count50,
        ));
    }

    out
}

/// Score timestamps come back in UTC+8.
fn score_date(date: &str, now: chrono::DateTime<Utc>) -> String {
    match NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") {
        Ok(naive) => pretty_date(naive.and_utc() - Duration::hours(8), now),
        Err(_) => "something's wrong".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testutil::ctx;

    fn split(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn keyed_client(server: &mockito::Server) -> OsuClient {
        OsuClient::with_base_url(server.url(), Some("key".to_string()))
    }

    #[test]
    fn test_maps_in_extracts_and_dedups() {
        let args = split(
            "check https://osu.ppy.sh/b/123?m=0 and https://osu.ppy.sh/s/77 and https://osu.ppy.sh/b/123",
        );
        assert_eq!(
            maps_in(&args),
            vec![
                BeatmapRef::Difficulty("123".to_string()),
                BeatmapRef::Set("77".to_string()),
            ]
        );
    }

    #[test]
    fn test_maps_in_ignores_other_links() {
        assert!(maps_in(&split("https://example.com/b/123")).is_empty());
        assert!(maps_in(&split("no links at all")).is_empty());
    }

    #[tokio::test]
    async fn test_profile_plain_user() {
        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        let osu = OsuClient::new(None);

        let reply = profile(&state, &osu, &ctx("c", "s", "u"), &split("!profile cookiezi"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "https://osu.ppy.sh/u/cookiezi");
    }

    #[tokio::test]
    async fn test_profile_spaces_are_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        let osu = OsuClient::new(None);

        let reply = profile(&state, &osu, &ctx("c", "s", "u"), &split("!profile two words"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "https://osu.ppy.sh/u/two%20words");
    }

    #[tokio::test]
    async fn test_profile_tag_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        let osu = OsuClient::new(None);
        let context = ctx("c", "s", "u");

        let reply = profile(&state, &osu, &context, &split("!profile cookiezi *ranks"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "https://osu.ppy.sh/u/cookiezi#_leader");

        let reply = profile(&state, &osu, &context, &split("!profile cookiezi *kudosu"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "https://osu.ppy.sh/u/cookiezi#_kudos");

        let reply = profile(&state, &osu, &context, &split("!profile cookiezi *events"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "https://osu.ppy.sh/u/cookiezi#_events");
    }

    #[tokio::test]
    async fn test_profile_associate_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        // Without an API key the name is stored as given.
        let osu = OsuClient::new(None);
        let context = ctx("c", "s", "u");

        let reply = profile(&state, &osu, &context, &split("!profile -m cookiezi"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("https://osu.ppy.sh/u/cookiezi"), "{}", reply);
        assert!(reply.contains("associated with this account"), "{}", reply);

        // Bare !profile now uses the stored association.
        let reply = profile(&state, &osu, &context, &split("!profile"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "https://osu.ppy.sh/u/cookiezi");

        let reply = profile(&state, &osu, &context, &split("!profile -m"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "*Removed association with osu! user.*");

        let reply = profile(&state, &osu, &context, &split("!profile -m"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "Please use `!profile -m <user>`");

        let reply = profile(&state, &osu, &context, &split("!profile"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, NOT_ASSOCIATED);
    }

    #[tokio::test]
    async fn test_profile_associate_resolves_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_user")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"[{"user_id":"124493","username":"cookiezi","country":"KR",
                     "pp_raw":"1","pp_rank":"1","pp_country_rank":"1","accuracy":"99",
                     "count_rank_ss":"1","count_rank_s":"1","count_rank_a":"1",
                     "playcount":"1"}]"#,
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        let osu = keyed_client(&server);
        let context = ctx("c", "s", "u");

        let reply = profile(&state, &osu, &context, &split("!profile -m cookiezi"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("https://osu.ppy.sh/u/124493"), "{}", reply);
        assert_eq!(
            state.osu_users.lock().await.get("u").map(String::as_str),
            Some("124493")
        );
    }

    #[tokio::test]
    async fn test_stats_disabled_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        let osu = OsuClient::new(None);

        let reply = stats(&state, &osu, &ctx("c", "s", "u"), &split("!stats cookiezi"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "This command is disabled. 👎");
    }

    #[tokio::test]
    async fn test_stats_unknown_user() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_user")
            .match_query(mockito::Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        let osu = keyed_client(&server);

        let reply = stats(&state, &osu, &ctx("c", "s", "u"), &split("!stats nobody"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "No such user 👎");
    }

    #[tokio::test]
    async fn test_stats_without_args_needs_association() {
        let dir = tempfile::tempdir().unwrap();
        let state = BotState::open(dir.path()).unwrap();
        let osu = OsuClient::new(None);

        let reply = stats(&state, &osu, &ctx("c", "s", "u"), &split("!stats"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, NOT_ASSOCIATED);
    }

    #[test]
    fn test_format_stats() {
        let user = OsuUser {
            user_id: "2".to_string(),
            username: "peppy".to_string(),
            country: "AU".to_string(),
            pp_raw: "4321.5".to_string(),
            pp_rank: "1234".to_string(),
            pp_country_rank: "56".to_string(),
            accuracy: "98.7654321".to_string(),
            count_rank_ss: "10".to_string(),
            count_rank_s: "200".to_string(),
            count_rank_a: "300".to_string(),
            playcount: "12345".to_string(),
        };

        let text = format_stats(&user);
        assert!(text.starts_with("**Stats for peppy** / https://osu.ppy.sh/u/2 ```"));
        assert!(text.contains("Performance: 4321.5pp (#1234) /AU #56"));
        assert!(text.contains("Accuracy:    98.765432 %"));
        assert!(text.contains("10 SS 200 S 300 A"));
        assert!(text.contains("Playcount:   12345"));
    }

    #[test]
    fn test_format_difficulty_with_top_score() {
        let map = Beatmap {
            artist: "Artist".to_string(),
            title: "Title".to_string(),
            creator: "Mapper".to_string(),
            version: "Insane".to_string(),
            approved: "1".to_string(),
            total_length: "205".to_string(),
            hit_length: "180".to_string(),
            bpm: "180".to_string(),
            max_combo: Some("500".to_string()),
            diff_size: "4".to_string(),
            diff_approach: "9".to_string(),
            diff_overall: "8".to_string(),
            diff_drain: "6".to_string(),
            difficultyrating: "5.256".to_string(),
            favourite_count: "10".to_string(),
            playcount: "1000".to_string(),
            passcount: "400".to_string(),
        };
        let score = Score {
            username: "player".to_string(),
            score: "12345678".to_string(),
            pp: Some("321.2".to_string()),
            maxcombo: "499".to_string(),
            countmiss: "1".to_string(),
            count300: "900".to_string(),
            count100: "50".to_string(),
            count50: "3".to_string(),
            date: "2016-01-01 12:00:00".to_string(),
        };

        let now = NaiveDateTime::parse_from_str("2016-01-03 04:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc();
        let text = format_difficulty(&map, Some(&score), now);

        assert!(text.contains("Artist - Title // Mapper [Insane]"), "{}", text);
        assert!(text.contains("Length: 0:03:25 (0:03:00 drain) BPM: 180 Max combo: 500"));
        assert!(text.contains("CS: 4 AR: 9 OD: 8 HP: 6 Stars: 5.26"));
        assert!(text.contains("Favourites: 10 / Success Rate: 400/1000"));
        assert!(text.contains("player is in the lead! (2 days ago)"), "{}", text);
        assert!(text.contains("Score: 12,345,678 / 321.2pp"));
        assert!(text.contains("Combo: 499x / Misses: 1"));
        assert!(text.contains("900x300 / 50x100 / 3x50"));
    }

    #[test]
    fn test_format_mapset() {
        let map = Beatmap {
            artist: "Artist".to_string(),
            title: "Title".to_string(),
            creator: "Mapper".to_string(),
            version: String::new(),
            approved: "1".to_string(),
            total_length: "205".to_string(),
            hit_length: "180".to_string(),
            bpm: "180".to_string(),
            max_combo: None,
            diff_size: "0".to_string(),
            diff_approach: "0".to_string(),
            diff_overall: "0".to_string(),
            diff_drain: "0".to_string(),
            difficultyrating: "0".to_string(),
            favourite_count: "10".to_string(),
            playcount: "0".to_string(),
            passcount: "0".to_string(),
        };

        let text = format_mapset(&map);
        assert!(text.contains("Artist - Title // Mapper```"));
        assert!(text.contains("Length: 0:03:25 BPM: 180"));
        assert!(text.contains("Favourites: 10"));
    }

    #[tokio::test]
    async fn test_map_info_disabled_without_key() {
        let osu = OsuClient::new(None);
        let maps = vec![BeatmapRef::Difficulty("123".to_string())];
        let text = map_info(&osu, &maps).await.unwrap();
        assert_eq!(text, "This command is disabled 👎");
    }
}
