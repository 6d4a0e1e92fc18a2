//! SQL Parser - quote-aware tokenizer + clause-ordered recursive descent
//!
//! The text is tokenized with the sqlparser-rs tokenizer (so keywords inside string
//! literals stay literals), then clauses are consumed in their canonical order:
//!
//! ```text
//! SELECT [DISTINCT] fields FROM table [JOIN ...] [WHERE ...] [GROUP BY ...] [ORDER BY ...] [LIMIT n]
//! INSERT INTO table (cols) VALUES (vals)
//! DELETE FROM table [WHERE ...]
//! ```
//!
//! There is no recovery: the first malformed clause rejects the whole query.

use crate::error::{TabqlError, TabqlResult};
use crate::sql::query::{
    AggregateCall, AggregateFunction, Clause, CompareOp, Condition, DeleteQuery, InsertQuery,
    JoinSpec, JoinType, OrderByField, QualifiedField, SelectItem, SelectQuery, SortDirection,
    Statement, WhereClause, is_reserved,
};
use crate::table::Value;
use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Word};

/// SQL 파서 - sqlparser-rs 토크나이저 기반
pub struct SqlParser {
    dialect: GenericDialect,
}

impl SqlParser {
    /// 새 SQL 파서 생성
    pub fn new() -> Self {
        Self {
            dialect: GenericDialect {},
        }
    }

    /// 선행 키워드로 문장 종류를 판별한 뒤 파싱
    pub fn parse(&self, sql: &str) -> TabqlResult<Statement> {
        let mut stream = self.tokenize(sql, Clause::Select)?;
        if stream.peek_keyword("SELECT") {
            Ok(Statement::Select(stream.parse_select()?))
        } else if stream.peek_keyword("INSERT") {
            Ok(Statement::Insert(stream.parse_insert()?))
        } else if stream.peek_keyword("DELETE") {
            Ok(Statement::Delete(stream.parse_delete()?))
        } else {
            Err(TabqlError::parse(
                Clause::Select,
                format!("expected SELECT, INSERT or DELETE, found {}", stream.found()),
            ))
        }
    }

    pub fn parse_select(&self, sql: &str) -> TabqlResult<SelectQuery> {
        self.tokenize(sql, Clause::Select)?.parse_select()
    }

    pub fn parse_insert(&self, sql: &str) -> TabqlResult<InsertQuery> {
        self.tokenize(sql, Clause::Insert)?.parse_insert()
    }

    pub fn parse_delete(&self, sql: &str) -> TabqlResult<DeleteQuery> {
        self.tokenize(sql, Clause::Delete)?.parse_delete()
    }

    fn tokenize(&self, sql: &str, clause: Clause) -> TabqlResult<TokenStream> {
        let tokens = Tokenizer::new(&self.dialect, sql)
            .tokenize()
            .map_err(|e| TabqlError::parse(clause, e.to_string()))?;

        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace(_) | Token::EOF))
            .collect();
        while matches!(tokens.last(), Some(Token::SemiColon)) {
            tokens.pop();
        }

        Ok(TokenStream { tokens, pos: 0 })
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// 공백이 제거된 토큰 커서
struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    // ════════════════════════════════════════════
    // Statements
    // ════════════════════════════════════════════

    fn parse_select(&mut self) -> TabqlResult<SelectQuery> {
        self.expect_keyword("SELECT", Clause::Select)?;
        let distinct = self.consume_keyword("DISTINCT");
        let fields = self.parse_select_items()?;

        if !self.consume_keyword("FROM") {
            return Err(TabqlError::parse(
                Clause::From,
                format!("expected FROM after field list, found {}", self.found()),
            ));
        }
        let table = self.parse_identifier(Clause::From)?;

        let mut query = SelectQuery::new(table, fields);
        query.distinct = distinct;
        let mut last = Clause::From;

        query.join = self.parse_join(&query.table)?;
        if query.join.is_some() {
            last = Clause::Join;
        }
        if self.consume_keyword("WHERE") {
            query.filter = Some(self.parse_condition(Clause::Where)?);
            last = Clause::Where;
        }
        if self.consume_keyword("GROUP") {
            self.expect_keyword("BY", Clause::GroupBy)?;
            query.group_by = self.parse_field_list(Clause::GroupBy)?;
            last = Clause::GroupBy;
        }
        if self.consume_keyword("ORDER") {
            self.expect_keyword("BY", Clause::OrderBy)?;
            query.order_by = self.parse_order_by()?;
            last = Clause::OrderBy;
        }
        if self.consume_keyword("LIMIT") {
            query.limit = Some(self.parse_limit()?);
            last = Clause::Limit;
        }

        self.expect_end(last)?;
        Ok(query)
    }

    fn parse_insert(&mut self) -> TabqlResult<InsertQuery> {
        self.expect_keyword("INSERT", Clause::Insert)?;
        self.expect_keyword("INTO", Clause::Insert)?;
        let table = self.parse_identifier(Clause::Insert)?;

        self.expect_token(&Token::LParen, Clause::Insert, "column list")?;
        let mut columns = vec![self.parse_identifier(Clause::Insert)?];
        while self.consume_token(&Token::Comma) {
            columns.push(self.parse_identifier(Clause::Insert)?);
        }
        self.expect_token(&Token::RParen, Clause::Insert, "')' after column list")?;

        self.expect_keyword("VALUES", Clause::Values)?;
        self.expect_token(&Token::LParen, Clause::Values, "value list")?;
        let mut values = vec![self.parse_value(Clause::Values)?];
        while self.consume_token(&Token::Comma) {
            values.push(self.parse_value(Clause::Values)?);
        }
        self.expect_token(&Token::RParen, Clause::Values, "')' after value list")?;

        self.expect_end(Clause::Values)?;
        Ok(InsertQuery {
            table,
            columns,
            values,
        })
    }

    fn parse_delete(&mut self) -> TabqlResult<DeleteQuery> {
        self.expect_keyword("DELETE", Clause::Delete)?;
        self.expect_keyword("FROM", Clause::Delete)?;
        let table = self.parse_identifier(Clause::Delete)?;

        let mut last = Clause::Delete;
        let filter = if self.consume_keyword("WHERE") {
            last = Clause::Where;
            Some(self.parse_condition(Clause::Where)?)
        } else {
            None
        };

        self.expect_end(last)?;
        Ok(DeleteQuery { table, filter })
    }

    // ════════════════════════════════════════════
    // Clauses
    // ════════════════════════════════════════════

    fn parse_select_items(&mut self) -> TabqlResult<Vec<SelectItem>> {
        let mut items = vec![self.parse_select_item()?];
        while self.consume_token(&Token::Comma) {
            items.push(self.parse_select_item()?);
        }
        Ok(items)
    }

    fn parse_select_item(&mut self) -> TabqlResult<SelectItem> {
        if self.consume_token(&Token::Mul) {
            return Ok(SelectItem::Wildcard);
        }

        let is_call = matches!(self.peek(), Some(Token::Word(w)) if w.quote_style.is_none())
            && matches!(self.peek_nth(1), Some(Token::LParen));
        if !is_call {
            return self.parse_field_name(Clause::Select).map(SelectItem::Column);
        }

        let name = self.parse_identifier(Clause::Select)?;
        let function = AggregateFunction::from_name(&name).ok_or_else(|| {
            TabqlError::parse(Clause::Select, format!("unsupported function '{}'", name))
        })?;
        self.expect_token(&Token::LParen, Clause::Select, "'('")?;
        let argument = if self.consume_token(&Token::Mul) {
            "*".to_string()
        } else {
            self.parse_field_name(Clause::Select)?
        };
        self.expect_token(&Token::RParen, Clause::Select, "')' after aggregate argument")?;

        Ok(SelectItem::Aggregate(AggregateCall::new(function, argument)))
    }

    /// `[INNER|LEFT|RIGHT] [OUTER] JOIN <table> ON <a>.<b> = <c>.<d>`
    fn parse_join(&mut self, base_table: &str) -> TabqlResult<Option<JoinSpec>> {
        let join_type = if self.consume_keyword("INNER") {
            JoinType::Inner
        } else if self.consume_keyword("LEFT") {
            JoinType::Left
        } else if self.consume_keyword("RIGHT") {
            JoinType::Right
        } else if self.peek_keyword("JOIN") {
            JoinType::Inner
        } else {
            return Ok(None);
        };
        if join_type != JoinType::Inner {
            self.consume_keyword("OUTER");
        }
        self.expect_keyword("JOIN", Clause::Join)?;
        let table = self.parse_identifier(Clause::Join)?;
        self.expect_keyword("ON", Clause::Join)?;

        let first = self.parse_qualified_field()?;
        if !self.consume_token(&Token::Eq) {
            return Err(TabqlError::parse(
                Clause::Join,
                format!("expected '=' in join condition, found {}", self.found()),
            ));
        }
        let second = self.parse_qualified_field()?;

        // 피연산자 순서와 무관하게 (기준 테이블, 조인 테이블) 순서로 정규화
        let (left_field, right_field) = if first.table == base_table && second.table == table {
            (first, second)
        } else if second.table == base_table && first.table == table {
            (second, first)
        } else {
            return Err(TabqlError::parse(
                Clause::Join,
                format!(
                    "join condition must reference '{}' and '{}', got {} = {}",
                    base_table, table, first, second
                ),
            ));
        };

        Ok(Some(JoinSpec {
            join_type,
            table,
            left_field,
            right_field,
        }))
    }

    fn parse_qualified_field(&mut self) -> TabqlResult<QualifiedField> {
        let table = self.parse_identifier(Clause::Join)?;
        if !self.consume_token(&Token::Period) {
            return Err(TabqlError::parse(
                Clause::Join,
                format!("join operand '{}' must be qualified as table.column", table),
            ));
        }
        let column = self.parse_identifier(Clause::Join)?;
        Ok(QualifiedField::new(table, column))
    }

    /// OR < AND < NOT precedence, parentheses allowed.
    fn parse_condition(&mut self, clause: Clause) -> TabqlResult<Condition> {
        let mut terms = vec![self.parse_conjunction(clause)?];
        while self.consume_keyword("OR") {
            terms.push(self.parse_conjunction(clause)?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Condition::Or(terms)
        })
    }

    fn parse_conjunction(&mut self, clause: Clause) -> TabqlResult<Condition> {
        let mut terms = vec![self.parse_unary(clause)?];
        while self.consume_keyword("AND") {
            terms.push(self.parse_unary(clause)?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Condition::And(terms)
        })
    }

    fn parse_unary(&mut self, clause: Clause) -> TabqlResult<Condition> {
        if self.consume_keyword("NOT") {
            return Ok(Condition::Not(Box::new(self.parse_unary(clause)?)));
        }
        if self.consume_token(&Token::LParen) {
            let inner = self.parse_condition(clause)?;
            self.expect_token(&Token::RParen, clause, "')'")?;
            return Ok(inner);
        }
        self.parse_comparison(clause)
    }

    fn parse_comparison(&mut self, clause: Clause) -> TabqlResult<Condition> {
        let field = self.parse_field_name(clause)?;

        if self.consume_keyword("IS") {
            let operator = if self.consume_keyword("NOT") {
                CompareOp::IsNotNull
            } else {
                CompareOp::IsNull
            };
            self.expect_keyword("NULL", clause)?;
            return Ok(Condition::Compare(WhereClause::new(
                field,
                operator,
                Value::Null,
            )));
        }

        if self.consume_keyword("NOT") {
            self.expect_keyword("LIKE", clause)?;
            let value = self.parse_value(clause)?;
            return Ok(Condition::Not(Box::new(Condition::Compare(
                WhereClause::new(field, CompareOp::Like, value),
            ))));
        }

        let symbol = match self.next_token() {
            Some(Token::Word(w)) if w.quote_style.is_none() => w.value,
            Some(token) => token.to_string(),
            None => {
                return Err(TabqlError::parse(
                    clause,
                    format!("expected comparison operator after '{}'", field),
                ));
            }
        };
        let operator: CompareOp = symbol.parse()?;
        let value = self.parse_value(clause)?;

        Ok(Condition::Compare(WhereClause::new(field, operator, value)))
    }

    fn parse_order_by(&mut self) -> TabqlResult<Vec<OrderByField>> {
        let mut fields = Vec::new();
        loop {
            let field = self.parse_field_name(Clause::OrderBy)?;
            let direction = if self.consume_keyword("DESC") {
                SortDirection::Desc
            } else {
                self.consume_keyword("ASC");
                SortDirection::Asc
            };
            fields.push(OrderByField::new(field, direction));
            if !self.consume_token(&Token::Comma) {
                return Ok(fields);
            }
        }
    }

    fn parse_limit(&mut self) -> TabqlResult<i64> {
        let negative = self.consume_token(&Token::Minus);
        match self.next_token() {
            Some(Token::Number(n, _)) => n
                .parse::<i64>()
                .map(|n| if negative { -n } else { n })
                .map_err(|_| {
                    TabqlError::parse(Clause::Limit, format!("'{}' is not an integer", n))
                }),
            other => Err(TabqlError::parse(
                Clause::Limit,
                format!("expected a row count, found {}", describe(other.as_ref())),
            )),
        }
    }

    // ════════════════════════════════════════════
    // Terminals
    // ════════════════════════════════════════════

    fn parse_field_list(&mut self, clause: Clause) -> TabqlResult<Vec<String>> {
        let mut fields = vec![self.parse_field_name(clause)?];
        while self.consume_token(&Token::Comma) {
            fields.push(self.parse_field_name(clause)?);
        }
        Ok(fields)
    }

    /// `column` or `table.column`
    fn parse_field_name(&mut self, clause: Clause) -> TabqlResult<String> {
        let mut name = self.parse_identifier(clause)?;
        if self.consume_token(&Token::Period) {
            name.push('.');
            name.push_str(&self.parse_identifier(clause)?);
        }
        Ok(name)
    }

    fn parse_identifier(&mut self, clause: Clause) -> TabqlResult<String> {
        match self.peek() {
            Some(Token::Word(w)) if w.quote_style.is_some() || !is_reserved(&w.value) => {
                let value = w.value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(TabqlError::parse(
                clause,
                format!("expected identifier, found {}", self.found()),
            )),
        }
    }

    /// Literal value: quoted string, number, bare word or NULL.
    fn parse_value(&mut self, clause: Clause) -> TabqlResult<Value> {
        let sign = if self.consume_token(&Token::Minus) {
            Some("-")
        } else if self.consume_token(&Token::Plus) {
            Some("")
        } else {
            None
        };

        match (sign, self.next_token()) {
            (Some(sign), Some(Token::Number(n, _))) => Ok(Value::text(format!("{}{}", sign, n))),
            (None, Some(Token::Number(n, _))) => Ok(Value::text(n)),
            (None, Some(Token::SingleQuotedString(s) | Token::DoubleQuotedString(s))) => {
                Ok(Value::text(s))
            }
            (None, Some(Token::Word(Word {
                value,
                quote_style: Some(_),
                ..
            }))) => Ok(Value::text(value)),
            (None, Some(Token::Word(w))) if w.value.eq_ignore_ascii_case("NULL") => Ok(Value::Null),
            (None, Some(Token::Word(w))) if !is_reserved(&w.value) => Ok(Value::text(w.value)),
            (_, other) => Err(TabqlError::parse(
                clause,
                format!("expected a value, found {}", describe(other.as_ref())),
            )),
        }
    }

    // ════════════════════════════════════════════
    // Cursor helpers
    // ════════════════════════════════════════════

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w))
            if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(keyword))
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str, clause: Clause) -> TabqlResult<()> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(TabqlError::parse(
                clause,
                format!("expected {}, found {}", keyword, self.found()),
            ))
        }
    }

    fn consume_token(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_token(&mut self, expected: &Token, clause: Clause, what: &str) -> TabqlResult<()> {
        if self.consume_token(expected) {
            Ok(())
        } else {
            Err(TabqlError::parse(
                clause,
                format!("expected {}, found {}", what, self.found()),
            ))
        }
    }

    fn expect_end(&self, last: Clause) -> TabqlResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(TabqlError::parse(
                last,
                format!("unexpected '{}' after {} clause", token, last),
            )),
        }
    }

    fn found(&self) -> String {
        describe(self.peek())
    }
}

fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => format!("'{}'", token),
        None => "end of input".to_string(),
    }
}
