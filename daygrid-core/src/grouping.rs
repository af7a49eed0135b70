//! Overlap grouping.
//!
//! Sessions are swept in start order. A session joins the current cluster
//! when it starts strictly before the latest end seen so far in that
//! cluster, so chains like A-B, A-C land together even when B ends before
//! C starts. Each member's offset is its admission index, which the
//! renderer uses as a column.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::types::{Session, SessionId, TimeSpan};

/// Index of a cluster within one grouping pass, in time order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

/// A session placed in a cluster.
#[derive(Debug, Clone, Copy)]
pub struct ClusterMember<'a> {
    pub session: &'a Session,
    /// Normalized interval used for grouping
    pub span: TimeSpan,
    /// Column index within the cluster, in `[0, group_size)`
    pub offset: usize,
}

/// A maximal run of transitively overlapping sessions.
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    pub id: ClusterId,
    /// Members in admission order; `members[i].offset == i`
    pub members: Vec<ClusterMember<'a>>,
    /// First start to latest end over all members
    pub span: TimeSpan,
}

impl<'a> Cluster<'a> {
    /// Number of sessions in the cluster.
    pub fn group_size(&self) -> usize {
        self.members.len()
    }

    fn close(id: ClusterId, admitted: Vec<(&'a Session, TimeSpan)>, end: u32) -> Self {
        let start = admitted.first().map(|(_, span)| span.start).unwrap_or(end);
        let members = admitted
            .into_iter()
            .enumerate()
            .map(|(offset, (session, span))| ClusterMember {
                session,
                span,
                offset,
            })
            .collect();

        Self {
            id,
            members,
            span: TimeSpan {
                start,
                end,
                normalized: false,
            },
        }
    }
}

/// Partition sessions into clusters of transitively overlapping intervals.
///
/// Sessions are ordered by start time, ties broken by id. Touching sessions
/// (one ends exactly when the next starts) are not overlapping. Sessions
/// whose end is not after their start are grouped as one minute long.
///
/// Fails on unparseable times and on duplicate ids. Empty input yields no
/// clusters.
pub fn group(sessions: &[Session]) -> Result<Vec<Cluster<'_>>> {
    let mut seen: HashSet<&SessionId> = HashSet::with_capacity(sessions.len());
    let mut entries: Vec<(&Session, TimeSpan)> = Vec::with_capacity(sessions.len());

    for session in sessions {
        if !seen.insert(&session.id) {
            return Err(Error::DuplicateSessionId(session.id.to_string()));
        }
        entries.push((session, session.span()?));
    }

    entries.sort_by(|(a, a_span), (b, b_span)| {
        a_span.start.cmp(&b_span.start).then_with(|| a.id.cmp(&b.id))
    });

    let mut clusters: Vec<Cluster<'_>> = Vec::new();
    let mut current: Vec<(&Session, TimeSpan)> = Vec::new();
    let mut cluster_end = 0u32;

    for (session, span) in entries {
        if !current.is_empty() && span.start >= cluster_end {
            let id = ClusterId(clusters.len());
            clusters.push(Cluster::close(id, std::mem::take(&mut current), cluster_end));
        }

        cluster_end = if current.is_empty() {
            span.end
        } else {
            cluster_end.max(span.end)
        };
        current.push((session, span));
    }

    if !current.is_empty() {
        let id = ClusterId(clusters.len());
        clusters.push(Cluster::close(id, current, cluster_end));
    }

    tracing::debug!(
        sessions = sessions.len(),
        clusters = clusters.len(),
        "Grouped sessions"
    );

    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use crate::time::to_time_string;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn session(id: &str, start: &str, end: &str) -> Session {
        Session::new(id, date(), start, end)
    }

    fn ids(cluster: &Cluster<'_>) -> Vec<String> {
        cluster
            .members
            .iter()
            .map(|m| m.session.id.to_string())
            .collect()
    }

    fn offsets(cluster: &Cluster<'_>) -> Vec<usize> {
        cluster.members.iter().map(|m| m.offset).collect()
    }

    /// Sessions built from `(start, length)` pairs in minutes, ids in input order.
    fn sessions_from(spans: &[(i64, i64)]) -> Vec<Session> {
        spans
            .iter()
            .enumerate()
            .map(|(i, &(start, length))| {
                session(
                    &format!("s{i:03}"),
                    &to_time_string(start),
                    &to_time_string(start + length),
                )
            })
            .collect()
    }

    /// Column-and-cluster shape of a grouping, independent of input order.
    fn shape(clusters: &[Cluster<'_>]) -> Vec<Vec<(String, usize)>> {
        clusters
            .iter()
            .map(|c| {
                c.members
                    .iter()
                    .map(|m| (m.session.id.to_string(), m.offset))
                    .collect()
            })
            .collect()
    }

    /// Day-time starts with lengths from zero up to two and a half hours.
    fn day_spans() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec((300i64..1260, 0i64..150), 0..40)
    }

    #[test]
    fn test_empty_input() {
        assert!(group(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_session() {
        let sessions = vec![session("a", "08:00", "09:00")];
        let clusters = group(&sessions).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].group_size(), 1);
        assert_eq!(offsets(&clusters[0]), vec![0]);
    }

    #[test]
    fn test_touching_sessions_are_separate() {
        let sessions = vec![session("a", "08:00", "09:00"), session("b", "09:00", "10:00")];
        let clusters = group(&sessions).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].group_size(), 1);
        assert_eq!(clusters[1].group_size(), 1);
        assert_eq!(offsets(&clusters[0]), vec![0]);
        assert_eq!(offsets(&clusters[1]), vec![0]);
    }

    #[test]
    fn test_overlapping_pair() {
        let sessions = vec![session("late", "08:30", "09:30"), session("early", "08:00", "09:00")];
        let clusters = group(&sessions).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec!["early", "late"]);
        assert_eq!(offsets(&clusters[0]), vec![0, 1]);
        assert_eq!(clusters[0].span.start, 480);
        assert_eq!(clusters[0].span.end, 570);
    }

    #[test]
    fn test_chain_uses_running_max_end() {
        // b ends before c starts, but a spans both
        let sessions = vec![
            session("a", "08:00", "10:00"),
            session("b", "08:30", "09:00"),
            session("c", "09:30", "11:00"),
        ];
        let clusters = group(&sessions).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].group_size(), 3);
        assert_eq!(ids(&clusters[0]), vec!["a", "b", "c"]);
        assert_eq!(clusters[0].span.end, 660);
    }

    #[test]
    fn test_same_start_breaks_ties_by_id() {
        let sessions = vec![
            session("zulu", "07:00", "08:00"),
            session("alpha", "07:00", "07:30"),
            session("mike", "07:00", "09:00"),
        ];
        let clusters = group(&sessions).unwrap();
        assert_eq!(ids(&clusters[0]), vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn test_zero_duration_session() {
        let sessions = vec![
            session("a", "10:00", "10:00"),
            session("b", "10:00", "10:30"),
            session("c", "10:01", "10:02"),
        ];
        let clusters = group(&sessions).unwrap();
        // a occupies 10:00-10:01, overlapping b; c touches a but overlaps b
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec!["a", "b", "c"]);
        assert!(clusters[0].members[0].span.normalized);
        assert_eq!(clusters[0].members[0].session.end_time, "10:00");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let sessions = vec![session("a", "08:00", "09:00"), session("a", "10:00", "11:00")];
        match group(&sessions) {
            Err(Error::DuplicateSessionId(id)) => assert_eq!(id, "a"),
            other => panic!("expected DuplicateSessionId, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_time_propagates() {
        let sessions = vec![session("a", "08:00", "9"), session("b", "08:00", "09:00")];
        assert!(matches!(
            group(&sessions),
            Err(Error::InvalidTimeFormat { .. })
        ));
    }

    proptest! {
        #[test]
        fn offsets_are_a_permutation_of_columns(spans in day_spans()) {
            let sessions = sessions_from(&spans);
            let clusters = group(&sessions).unwrap();

            let total: usize = clusters.iter().map(Cluster::group_size).sum();
            prop_assert_eq!(total, sessions.len());

            for (index, cluster) in clusters.iter().enumerate() {
                prop_assert_eq!(cluster.id, ClusterId(index));
                let mut seen = offsets(cluster);
                seen.sort_unstable();
                prop_assert_eq!(seen, (0..cluster.group_size()).collect::<Vec<_>>());
            }
        }

        #[test]
        fn clusters_never_overlap_each_other(spans in day_spans()) {
            let sessions = sessions_from(&spans);
            let clusters = group(&sessions).unwrap();

            for (i, a) in clusters.iter().enumerate() {
                for b in clusters.iter().skip(i + 1) {
                    prop_assert!(a.span.end <= b.span.start);
                    for ma in &a.members {
                        for mb in &b.members {
                            prop_assert!(!ma.span.overlaps(&mb.span));
                        }
                    }
                }
            }
        }

        #[test]
        fn cluster_members_chain_through_overlaps(spans in day_spans()) {
            let sessions = sessions_from(&spans);
            let clusters = group(&sessions).unwrap();

            for cluster in &clusters {
                // Every member is reachable from the first through overlapping pairs
                let mut reached = vec![false; cluster.members.len()];
                reached[0] = true;
                let mut frontier = vec![0];
                while let Some(i) = frontier.pop() {
                    for (j, other) in cluster.members.iter().enumerate() {
                        if !reached[j] && cluster.members[i].span.overlaps(&other.span) {
                            reached[j] = true;
                            frontier.push(j);
                        }
                    }
                }
                prop_assert!(reached.iter().all(|r| *r), "cluster {:?}", cluster.id);
            }
        }

        #[test]
        fn regrouping_sorted_output_is_stable(spans in day_spans()) {
            let sessions = sessions_from(&spans);
            let first = group(&sessions).unwrap();

            let flattened: Vec<Session> = first
                .iter()
                .flat_map(|c| c.members.iter().map(|m| m.session.clone()))
                .collect();
            let mut reversed = sessions.clone();
            reversed.reverse();

            prop_assert_eq!(shape(&group(&flattened).unwrap()), shape(&first));
            prop_assert_eq!(shape(&group(&reversed).unwrap()), shape(&first));
        }
    }
}
