// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn rewrite_assigns_stable_positions_per_name() {
    let (sql, names) = rewrite_named_params("insert into t (a, b) values (:a, :b)");
    assert_eq!(sql, "insert into t (a, b) values ($1, $2)");
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn rewrite_reuses_position_for_repeated_name() {
    let (sql, names) = rewrite_named_params("update t set a = :a where a <> :a");
    assert_eq!(sql, "update t set a = $1 where a <> $1");
    assert_eq!(names, vec!["a".to_string()]);
}

#[test]
fn rewrite_ignores_sql_without_placeholders() {
    let (sql, names) = rewrite_named_params("select 1");
    assert_eq!(sql, "select 1");
    assert!(names.is_empty());
}
